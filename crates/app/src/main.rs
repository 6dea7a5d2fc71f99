//! Entry point for meshview.
//! Logging + CLI flags, then hands over to the platform loop.

use std::time::Duration;

use anyhow::Result;
use platform::RunConfig;

/// Environment variable consulted when `--repo` is absent.
const REPO_ENV: &str = "MESHVIEW_REPO";

fn parse_backend_arg(args: &[String]) -> wgpu::Backends {
    // Accept: --gpu-backend=auto|vulkan|dx12|metal|gl
    let mut backends = wgpu::Backends::all(); // default = auto
    for arg in args {
        if let Some(val) = arg.strip_prefix("--gpu-backend=") {
            backends = match val.to_ascii_lowercase().as_str() {
                "auto" => wgpu::Backends::all(),
                "vulkan" | "vk" => wgpu::Backends::VULKAN,
                "dx12" | "d3d12" => wgpu::Backends::DX12,
                "metal" | "mtl" => wgpu::Backends::METAL,
                "gl" | "opengl" | "gles" => wgpu::Backends::GL,
                other => {
                    log::warn!("Unknown backend '{other}', falling back to auto.");
                    wgpu::Backends::all()
                }
            };
        }
    }
    backends
}

fn parse_size_args(args: &[String]) -> (u32, u32) {
    let mut w: Option<u32> = None;
    let mut h: Option<u32> = None;

    for arg in args {
        if let Some(v) = arg.strip_prefix("--size=") {
            if let Some((sw, sh)) = v.split_once('x').or_else(|| v.split_once('X')) {
                if let (Ok(pw), Ok(ph)) = (sw.parse::<u32>(), sh.parse::<u32>()) {
                    w = Some(pw);
                    h = Some(ph);
                }
            }
        } else if let Some(v) = arg.strip_prefix("--width=") {
            if let Ok(pw) = v.parse::<u32>() {
                w = Some(pw);
            }
        } else if let Some(v) = arg.strip_prefix("--height=") {
            if let Ok(ph) = v.parse::<u32>() {
                h = Some(ph);
            }
        }
    }

    let ww = w.unwrap_or(1280).max(1);
    let hh = h.unwrap_or(720).max(1);
    (ww, hh)
}

/// `--repo=<locator>`, else the environment fallback. Blank values count as absent.
fn parse_repo_arg(args: &[String], env: Option<String>) -> Option<String> {
    args.iter()
        .rev()
        .find_map(|arg| arg.strip_prefix("--repo="))
        .map(str::to_string)
        .or(env)
        .filter(|locator| !locator.trim().is_empty())
}

fn parse_timeout_arg(args: &[String]) -> Duration {
    let secs = args
        .iter()
        .rev()
        .find_map(|arg| arg.strip_prefix("--timeout-secs="))
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(30);
    Duration::from_secs(secs)
}

fn parse_config(args: &[String], env_repo: Option<String>) -> RunConfig {
    let (width, height) = parse_size_args(args);
    RunConfig {
        backends: parse_backend_arg(args),
        width,
        height,
        repo: parse_repo_arg(args, env_repo),
        timeout: parse_timeout_arg(args),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = parse_config(&args, std::env::var(REPO_ENV).ok());
    log::info!(
        "Starting meshview. Backend: {:?}, window_size={}x{}, repo={}, timeout={}s",
        config.backends,
        config.width,
        config.height,
        config.repo.as_deref().unwrap_or("<none>"),
        config.timeout.as_secs()
    );

    platform::run_viewer(config)?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}
