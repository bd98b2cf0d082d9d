use anyhow::Result;
use oddl::debug::{EventLog, write_events};
use oddl::read::read_all;

const INPUT: &[u8] = include_bytes!("t-input.oddl");
const EXPECTED: &[u8] = include_bytes!("t-expected.txt");

#[test]
fn t1() -> Result<()> {
    let events = read_all(INPUT, &mut EventLog::new())?;
    let mut out = Vec::<u8>::new();
    write_events(&mut out, &events)?;
    assert_eq!(String::from_utf8(out)?, std::str::from_utf8(EXPECTED)?);
    Ok(())
}
