//! This is a basic example with help page, usage and error handling.
//!
//! Try `basic --help`, `basic -vn 3 --name=world a b` or `basic -x`.  Set
//! `RUST_LOG=trace` to see what the tokenizer does.
use flagset_parser::{ErrorHandling, FlagSet, Parser};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut flags = FlagSet::new("basic", ErrorHandling::Exit);
    flags
        .bool("v", false, "verbose output")
        .int("n", 1, "how many times to greet")
        .string("name", "stranger", "who to greet");

    let mut parser = Parser::new(flags);
    if let Err(err) = parser.parse_env() {
        parser.registry_mut().handle_error(err);
    }

    let flags = parser.registry();
    let name = flags.value_of("name").unwrap_or_default();
    for _ in 0..flags.get::<i64>("n").unwrap_or(1) {
        println!("Hello {}!", name);
    }
    if flags.get::<bool>("v") == Some(true) {
        println!("positional arguments: {:?}", parser.args());
    }
}
