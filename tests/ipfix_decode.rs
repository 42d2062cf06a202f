//! IPFIX decode properties 1-3 and scenarios S1/S2.

use flow_telemetry::ipfix::{self, TemplateCache};

fn be16(v: u16) -> [u8; 2] {
    v.to_be_bytes()
}

fn be32(v: u32) -> [u8; 4] {
    v.to_be_bytes()
}

/// One template FlowSet (id 256, fields: sourceIPv4Address, destinationIPv4Address,
/// octetDeltaCount) followed by one data FlowSet carrying two records, matching
/// scenario S1.
fn happy_path_message() -> Vec<u8> {
    let mut template_body = Vec::new();
    template_body.extend(be16(256)); // template id
    template_body.extend(be16(3)); // field count
    template_body.extend(be16(8)); // sourceIPv4Address
    template_body.extend(be16(4));
    template_body.extend(be16(12)); // destinationIPv4Address
    template_body.extend(be16(4));
    template_body.extend(be16(1)); // octetDeltaCount
    template_body.extend(be16(4));

    let mut template_set = Vec::new();
    template_set.extend(be16(2)); // TEMPLATE_SET_ID
    template_set.extend(be16((4 + template_body.len()) as u16));
    template_set.extend(template_body);

    let mut data_body = Vec::new();
    data_body.extend([1, 1, 1, 1]);
    data_body.extend([2, 2, 2, 2]);
    data_body.extend(be32(100));
    data_body.extend([3, 3, 3, 3]);
    data_body.extend([4, 4, 4, 4]);
    data_body.extend(be32(200));

    let mut data_set = Vec::new();
    data_set.extend(be16(256));
    data_set.extend(be16((4 + data_body.len()) as u16));
    data_set.extend(data_body);

    let body_len = template_set.len() + data_set.len();
    let mut message = Vec::new();
    message.extend(be16(10)); // version
    message.extend(be16((16 + body_len) as u16)); // total length
    message.extend(be32(1_700_000_000)); // export_time
    message.extend(be32(42)); // sequence_number
    message.extend(be32(7)); // observation_domain_id
    message.extend(template_set);
    message.extend(data_set);
    message
}

/// Property 1 (header half): every header field matches the literal bytes at
/// its known offset. This crate only ever decodes IPFIX (it has no exporter
/// role), so the round-trip-through-re-encoding half of property 1 has no
/// counterpart here; see DESIGN.md.
#[test]
fn property_1_header_fields_match_known_offsets() {
    let message = happy_path_message();
    let mut cache = TemplateCache::new();
    let decoded = ipfix::decode(&message, &mut cache).expect("decodes");

    assert_eq!(decoded.header.version, u16::from_be_bytes([message[0], message[1]]));
    assert_eq!(decoded.header.length, u16::from_be_bytes([message[2], message[3]]));
    assert_eq!(decoded.header.export_time, u32::from_be_bytes(message[4..8].try_into().unwrap()));
    assert_eq!(decoded.header.sequence_number, u32::from_be_bytes(message[8..12].try_into().unwrap()));
    assert_eq!(decoded.header.observation_domain_id, u32::from_be_bytes(message[12..16].try_into().unwrap()));
}

#[test]
fn s1_ipfix_happy_path_decodes_both_records() {
    let message = happy_path_message();
    let mut cache = TemplateCache::new();

    let decoded = ipfix::decode(&message, &mut cache).expect("valid message decodes");

    assert_eq!(decoded.header.observation_domain_id, 7);
    assert_eq!(decoded.records.len(), 2);

    let first = &decoded.records[0];
    assert_eq!(first.source_ipv4, Some(std::net::Ipv4Addr::new(1, 1, 1, 1)));
    assert_eq!(first.destination_ipv4, Some(std::net::Ipv4Addr::new(2, 2, 2, 2)));
    assert_eq!(first.octet_delta_count, Some(100));

    let second = &decoded.records[1];
    assert_eq!(second.source_ipv4, Some(std::net::Ipv4Addr::new(3, 3, 3, 3)));
    assert_eq!(second.octet_delta_count, Some(200));
}

#[test]
fn property_2_template_must_precede_data() {
    let message = happy_path_message();
    let mut cache = TemplateCache::new();
    let decoded = ipfix::decode(&message, &mut cache).expect("decodes");
    assert_eq!(decoded.records.len(), 2);

    // reversing order: replay just the data-only half of the message against
    // a fresh cache that has never learned the template.
    let data_only = &message[16 + 20..];
    let mut header_plus_data = Vec::new();
    header_plus_data.extend(be16(10));
    header_plus_data.extend(be16((16 + data_only.len()) as u16));
    header_plus_data.extend(be32(1_700_000_000));
    header_plus_data.extend(be32(42));
    header_plus_data.extend(be32(7));
    header_plus_data.extend_from_slice(data_only);

    let mut fresh_cache = TemplateCache::new();
    let decoded = ipfix::decode(&header_plus_data, &mut fresh_cache).expect("decodes without error, just no records");
    assert_eq!(decoded.records.len(), 0, "data flowset referencing an unlearned template yields no records");
}

#[test]
fn s2_template_miss_then_recovery() {
    let message = happy_path_message();
    let mut cache = TemplateCache::new();

    // Send the data-only half first (no template yet): silently skipped.
    let data_set_start = 16 + 20;
    let data_only = &message[data_set_start..];
    let mut early = Vec::new();
    early.extend(be16(10));
    early.extend(be16((16 + data_only.len()) as u16));
    early.extend(be32(0));
    early.extend(be32(1));
    early.extend(be32(7));
    early.extend_from_slice(data_only);
    let decoded = ipfix::decode(&early, &mut cache).expect("decodes");
    assert!(decoded.records.is_empty());

    // Now send the full message (template + data): template is learned and
    // this message's own data flowset decodes.
    let decoded = ipfix::decode(&message, &mut cache).expect("decodes");
    assert_eq!(decoded.records.len(), 2);
}

#[test]
fn property_3_truncation_never_panics() {
    let message = happy_path_message();
    let mut cache = TemplateCache::new();
    // Prime the cache so some truncations exercise data-flowset truncation
    // handling rather than only header truncation.
    let _ = ipfix::decode(&message, &mut cache);

    for k in 1..message.len() {
        let truncated = &message[..message.len() - k];
        let mut cache = TemplateCache::new();
        // Must never panic; Ok or Err are both acceptable outcomes.
        let _ = ipfix::decode(truncated, &mut cache);
    }
}

#[test]
fn non_v10_header_version_is_tolerated_and_passed_through() {
    let mut message = happy_path_message();
    message[0..2].copy_from_slice(&be16(9));
    let mut cache = TemplateCache::new();
    let decoded = ipfix::decode(&message, &mut cache).expect("a non-10 version is not a decode error");
    assert_eq!(decoded.header.version, 9);
    assert_eq!(decoded.records.len(), 2, "flowset framing still decodes regardless of declared version");
}
