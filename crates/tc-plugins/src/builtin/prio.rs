//! The `prio` classful qdisc, shipped as the `q_prio.so` extension unit.
//!
//! Its payload is `struct tc_prio_qopt { int bands; __u8 priomap[16]; }`.
#![expect(
    clippy::host_endian_bytes,
    reason = "qdisc option structures are laid out in host byte order"
)]

use std::io::{self, Write};

use tc_netlink::TcRequest;
use tc_netlink::attr::read_i32;
use tc_netlink::consts::TCA_OPTIONS;

use super::args::{Words, parse_u32};
use crate::error::OptionError;
use crate::handler::QdiscHandler;

/// Kind served by this handler.
pub const KIND: &str = "prio";

const MAX_BANDS: u32 = 16;
const PRIOMAP_LEN: usize = 16;
const QOPT_LEN: usize = 4 + PRIOMAP_LEN;
const DEFAULT_BANDS: u32 = 3;
const DEFAULT_PRIOMAP: [u8; PRIOMAP_LEN] = [1, 2, 2, 2, 1, 2, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1];
const USAGE: &str = "Usage: ... prio bands NUMBER priomap P1 P2...[multiqueue]";

/// The priority qdisc.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Prio;

impl Prio {
    fn encode(bands: u32, priomap: &[u8; PRIOMAP_LEN]) -> Vec<u8> {
        let mut payload = Vec::with_capacity(QOPT_LEN);
        payload.extend_from_slice(&bands.to_ne_bytes());
        payload.extend_from_slice(priomap);
        payload
    }
}

impl QdiscHandler for Prio {
    fn id(&self) -> &str {
        KIND
    }

    fn parse_options(&self, args: &[String], request: &mut TcRequest) -> Result<(), OptionError> {
        let mut bands = DEFAULT_BANDS;
        let mut priomap = DEFAULT_PRIOMAP;
        let mut words = Words::new(args);
        while let Some(word) = words.next() {
            match word {
                "bands" => {
                    bands = parse_u32(words.value(word)?)
                        .filter(|value| (2..=MAX_BANDS).contains(value))
                        .ok_or_else(|| OptionError::invalid(word))?;
                }
                "priomap" => {
                    for slot in &mut priomap {
                        let Some(band) = words.peek().and_then(parse_u32) else {
                            break;
                        };
                        words.next();
                        *slot = u8::try_from(band)
                            .ok()
                            .filter(|value| u32::from(*value) < bands)
                            .ok_or_else(|| OptionError::invalid("priomap"))?;
                    }
                }
                "multiqueue" => {}
                "help" => return Err(OptionError::Usage { usage: USAGE }),
                other => return Err(OptionError::unknown(other)),
            }
        }
        request.push_attr(TCA_OPTIONS, &Self::encode(bands, &priomap));
        Ok(())
    }

    fn print_options(&self, out: &mut dyn Write, options: Option<&[u8]>) -> io::Result<()> {
        let Some(payload) = options.filter(|payload| payload.len() >= QOPT_LEN) else {
            return Ok(());
        };
        let bands = read_i32(payload).unwrap_or_default();
        write!(out, "bands {bands} priomap ")?;
        for band in payload.iter().skip(4).take(PRIOMAP_LEN) {
            write!(out, " {band}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use tc_netlink::consts::{NLM_F_REQUEST, RTM_NEWQDISC};

    use super::*;
    use crate::builtin::test_support::{render, words};

    fn parse(args: &[&str]) -> Result<Vec<u8>, OptionError> {
        let mut request = TcRequest::new(RTM_NEWQDISC, NLM_F_REQUEST);
        Prio.parse_options(&words(args), &mut request)?;
        Ok(request.attribute(TCA_OPTIONS).unwrap_or_default().to_vec())
    }

    #[test]
    fn defaults_match_the_kernel() {
        let payload = parse(&[]).expect("defaults parse");
        assert_eq!(payload, Prio::encode(3, &DEFAULT_PRIOMAP));
        assert_eq!(
            render(|out| Prio.print_options(out, Some(&payload))),
            "bands 3 priomap  1 2 2 2 1 2 0 0 1 1 1 1 1 1 1 1"
        );
    }

    #[test]
    fn partial_priomap_keeps_remaining_defaults() {
        let payload = parse(&["bands", "4", "priomap", "3", "3", "multiqueue"]).expect("parses");
        let mut expected = DEFAULT_PRIOMAP;
        expected[0] = 3;
        expected[1] = 3;
        assert_eq!(payload, Prio::encode(4, &expected));
    }

    #[rstest]
    #[case(&["bands", "1"], "Illegal \"bands\"")]
    #[case(&["bands", "17"], "Illegal \"bands\"")]
    #[case(&["priomap", "3"], "Illegal \"priomap\"")]
    #[case(&["weights"], "What is \"weights\"?")]
    fn rejects_bad_options(#[case] args: &[&str], #[case] message: &str) {
        assert_eq!(parse(args).expect_err("rejected").to_string(), message);
    }
}
