//! Container level tests for `l5anim-rs`

mod containers;
mod export;

/// Initialize logger with default level set to info if `RUST_LOG` is not set
fn init_logger() {
	let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
		.is_test(true)
		.try_init();
}
