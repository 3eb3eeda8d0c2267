use busdec::protocol::Variant;

fn main() -> anyhow::Result<()> {
    busdec_cli::main(Variant::If)
}
