use we32regs::{psw::Psw, word_from_args};

fn main() -> anyhow::Result<()> {
    let word = word_from_args("Usage: psw <status word>")?;
    print!("{}", Psw(word));
    Ok(())
}
