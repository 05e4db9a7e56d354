//! HostForge - 静态站点部署代理
//!
//! Usage:
//! - Normal mode: `hostforge`
//! - With custom port: `hostforge --port 8080`
//! - Bind all interfaces: `hostforge --host 0.0.0.0`

use hostforge::RuntimeConfig;
use tracing_subscriber::EnvFilter;

/// 解析命令行参数
fn parse_args() -> RuntimeConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = RuntimeConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" if i + 1 < args.len() => {
                config.port_override = args[i + 1].parse().ok();
                i += 2;
            }
            "--host" if i + 1 < args.len() => {
                config.host_override = Some(args[i + 1].clone());
                i += 2;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                i += 1;
            }
        }
    }

    config
}

fn print_help() {
    println!("HostForge - 静态站点部署代理");
    println!();
    println!("USAGE:");
    println!("    hostforge [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --port <PORT>    Override the listening port (default 5000)");
    println!("    --host <HOST>    Override the bind address (default 0.0.0.0)");
    println!("    -h, --help       Print help information");
    println!();
    println!("ENVIRONMENT:");
    println!("    TERRAFORM_DIR    Terraform configuration directory (default ./terraform)");
    println!("    FRONTEND_DIR     Static frontend directory (default ./frontend)");
    println!("    UPLOADS_DIR      Per-request scratch directory parent");
    println!("    TERRAFORM_PATH   Explicit terraform executable");
    println!("    AZ_PATH          Explicit Azure CLI executable");
    println!("    MAX_UPLOAD_MB    Request body limit in megabytes (default 100)");
    println!("    RUST_LOG         Log filter (default hostforge=info,tower_http=info)");
}

fn main() {
    let config = parse_args();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hostforge=info,tower_http=info")),
        )
        .init();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(hostforge::init_and_run(config)) {
        tracing::error!(error = %format!("{:#}", e), "HostForge agent exited with error");
        std::process::exit(1);
    }
}
