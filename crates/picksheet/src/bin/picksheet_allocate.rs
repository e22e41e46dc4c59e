//! picksheet-allocate - Build a picking sheet from an inventory snapshot.
//!
//! Primary binary for allocating lots and locations to order lines.

fn main() -> std::process::ExitCode {
    picksheet::cmd::allocate_cmd::main()
}
