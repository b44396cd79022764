use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Directives applied on top of the default level; `RUST_LOG` still wins.
const QUIET_DEPENDENCIES: [&str; 2] = ["reqwest=warn", "hyper=warn"];

pub(crate) fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let mut env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();
    for directive in QUIET_DEPENDENCIES {
        if let Ok(directive) = directive.parse() {
            env_filter = env_filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
