//! Link-layer protocol names used by filters.

/// Known protocol names and their EtherType values.
const PROTOCOLS: &[(&str, u16)] = &[
    ("all", 0x0003),
    ("ip", 0x0800),
    ("arp", 0x0806),
    ("rarp", 0x8035),
    ("802.1Q", 0x8100),
    ("ipv6", 0x86dd),
    ("mpls_uc", 0x8847),
    ("mpls_mc", 0x8848),
    ("802.1ad", 0x88a8),
];

/// Parses a protocol name (case-insensitive) or a numeric EtherType.
pub(super) fn parse(text: &str) -> Option<u16> {
    if let Some(&(_, id)) = PROTOCOLS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(text))
    {
        return Some(id);
    }
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(digits) => u16::from_str_radix(digits, 16).ok(),
        None => text.parse().ok(),
    }
}

/// The name of EtherType `id`, or `[id]` when it has none.
pub(super) fn name(id: u16) -> String {
    PROTOCOLS
        .iter()
        .find(|&&(_, known)| known == id)
        .map_or_else(|| format!("[{id}]"), |&(name, _)| name.to_owned())
}

/// Packs a filter preference and host-order protocol into `tcm_info`.
pub(super) fn pack_info(preference: u16, protocol: u16) -> u32 {
    (u32::from(preference) << 16) | u32::from(protocol.to_be())
}

/// Splits `tcm_info` into preference and host-order protocol.
pub(super) fn split_info(info: u32) -> (u16, u16) {
    let preference = u16::try_from(info >> 16).unwrap_or_default();
    let network = u16::try_from(info & 0xffff).unwrap_or_default();
    (preference, u16::from_be(network))
}
