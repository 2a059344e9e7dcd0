use std::io::Read;

use rudder::ResponseParser;

/// Reads a raw model completion from the file named by the first argument,
/// or stdin when none is given, and prints the parsed envelope as JSON.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let raw = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let parsed = ResponseParser::new().parse(&raw);
    println!("{}", serde_json::to_string_pretty(&parsed)?);

    Ok(())
}
