//! `pageguard` probe: run the page-load guard natively against a backend.
//!
//! ```text
//! pageguard <path>             classify and guard a path
//! pageguard login <username>   sign in (password from PAGEGUARD_PASSWORD)
//! pageguard logout             clear the stored session
//! ```

use pageguard::app::{Navigator, PageGuard};
use pageguard::core::config::Config;
use pageguard::core::native::{FileStorage, ReqwestBackend};
use pageguard::core::{AuthOutcome, sign_in};

const USAGE: &str = "usage: pageguard <path> | login <username> | logout";

/// Prints where the browser would have been sent
struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&self, location: &str) {
        println!("redirect {}", location);
    }
}

#[tokio::main]
async fn main() {
    // Load .env file (if exists)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    std::process::exit(run(std::env::args().skip(1).collect()).await);
}

async fn run(args: Vec<String>) -> i32 {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return 2;
        }
    };
    let storage = FileStorage::new(&config.session_file);
    tracing::info!(
        "Config loaded: api_base={}, session_file={}",
        config.api_base,
        storage.path().display()
    );

    let backend = ReqwestBackend::new(config);
    let guard = PageGuard::new(&storage, &backend, &PrintNavigator);

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["logout"] => {
            guard.logout();
            0
        }
        ["login", username] => {
            let password = std::env::var("PAGEGUARD_PASSWORD").unwrap_or_default();
            match sign_in(&backend, &storage, username, &password).await {
                Ok(user) => {
                    println!("signed in as {}", user.display_name());
                    0
                }
                Err(e) => {
                    eprintln!("sign in failed: {}", e);
                    1
                }
            }
        }
        [path] => {
            let load = guard.on_page_load(path).await;
            println!("route {:?}", load.route);
            match load.outcome {
                None => println!("not guarded"),
                Some(AuthOutcome::Authorized { ref user, refreshed }) => match user {
                    Some(user) => println!("authorized as {}", user.display_name()),
                    None if refreshed => println!("authorized (token refreshed)"),
                    None => println!("authorized"),
                },
                Some(AuthOutcome::LoginRequired { reason, .. }) => {
                    println!("denied {:?}", reason)
                }
            }
            if load.is_allowed() { 0 } else { 1 }
        }
        _ => {
            eprintln!("{}", USAGE);
            2
        }
    }
}
