/// Intercept messages using the `log` crate and print them to STDERR. STDOUT is reserved for
/// generated records. The filter defaults to `info` and can be overridden with `RUST_LOG`.
pub fn setup() {
    use env_logger::{Builder, Env, Target};
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stderr)
        .init();
}
