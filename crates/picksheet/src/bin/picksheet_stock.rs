//! picksheet-stock - Inventory on hand by account.

fn main() -> std::process::ExitCode {
    picksheet::cmd::stock_cmd::main()
}
