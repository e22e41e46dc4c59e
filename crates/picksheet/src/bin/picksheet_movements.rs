//! picksheet-movements - Inbound and outbound stock movements.

fn main() -> std::process::ExitCode {
    picksheet::cmd::movements_cmd::main()
}
