fn main() -> anyhow::Result<()> {
    gowalk_cli::run()
}
