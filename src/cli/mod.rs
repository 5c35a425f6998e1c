mod args;

pub use args::{AlignArgs, CliArgs, Command, CommonArgs, CompressionLevel, RetileArgs};
