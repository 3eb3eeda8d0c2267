use we32regs::{vaddr::PagedAddress, word_from_args};

fn main() -> anyhow::Result<()> {
    let word = word_from_args("Usage: check-vaddr <vaddr>")?;
    print!("{}", PagedAddress(word));
    Ok(())
}
