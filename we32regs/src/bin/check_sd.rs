use we32regs::{segment::SegmentDescriptor, word_from_args};

fn main() -> anyhow::Result<()> {
    let word = word_from_args("Usage: check-sd <descriptor>")?;
    print!("{}", SegmentDescriptor(word));
    Ok(())
}
