// Metadata marshaling between MetadataMap and the engine's MetadataArray.

use bytes::Bytes;
use dmxp_callops::Core::metadata::{fill_metadata_array, fill_metadata_map};
use dmxp_callops::{MetadataArray, MetadataMap};

fn random_token(len: usize) -> String {
    (0..len).map(|_| fastrand::alphanumeric()).collect()
}

#[test]
fn array_preserves_order_and_duplicates() {
    let mut map = MetadataMap::new();
    map.insert("x-trace", "a");
    map.insert("authorization", "Bearer t");
    map.insert("x-trace", "b");
    map.insert("x-trace", "c");

    let array = fill_metadata_array(&map);
    assert_eq!(array.count(), 4);

    let pairs: Vec<(&[u8], &[u8])> = array
        .entries
        .iter()
        .map(|e| (e.key.as_ref(), e.value.as_ref()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (&b"x-trace"[..], &b"a"[..]),
            (&b"authorization"[..], &b"Bearer t"[..]),
            (&b"x-trace"[..], &b"b"[..]),
            (&b"x-trace"[..], &b"c"[..]),
        ]
    );

    // input is only borrowed
    assert_eq!(map.len(), 4);
}

#[test]
fn map_from_engine_array() {
    let mut array = MetadataArray::new();
    array.push(&b"content-type"[..], &b"application/grpc"[..]);
    array.push(&b"x-dup"[..], &b"1"[..]);
    array.push(&b"x-dup"[..], &b"2"[..]);

    let map = fill_metadata_map(array);
    assert_eq!(map.len(), 3);
    assert_eq!(map.get_str("content-type"), Some("application/grpc"));
    assert_eq!(map.get_all("x-dup").collect::<Vec<_>>(), vec![&b"1"[..], &b"2"[..]]);
    assert_eq!(map.get("missing"), None);
}

#[test]
fn empty_round_trip() {
    let array = fill_metadata_array(&MetadataMap::new());
    assert!(array.is_empty());
    assert!(fill_metadata_map(array).is_empty());
}

#[test]
fn randomized_round_trip_is_exact() {
    for _ in 0..50 {
        let mut map = MetadataMap::new();
        let keys: Vec<String> = (0..fastrand::usize(1..4))
            .map(|_| random_token(fastrand::usize(1..12)).to_lowercase())
            .collect();
        for _ in 0..fastrand::usize(0..20) {
            let key = &keys[fastrand::usize(..keys.len())];
            map.insert(key.clone(), random_token(fastrand::usize(0..32)));
        }

        let echoed = fill_metadata_map(fill_metadata_array(&map).clone());
        assert_eq!(echoed, map);
        for key in &keys {
            assert_eq!(
                echoed.get_all(key).collect::<Vec<_>>(),
                map.get_all(key).collect::<Vec<_>>()
            );
        }
    }
}

#[test]
fn non_ascii_values_survive() {
    let map: MetadataMap = vec![("grpc-message", "héllo wörld ✓"), ("k", "")].into_iter().collect();
    let echoed = fill_metadata_map(fill_metadata_array(&map));
    assert_eq!(echoed.get_str("grpc-message"), Some("héllo wörld ✓"));
    assert_eq!(echoed.get("k"), Some(&b""[..]));
}

#[test]
fn binary_values_survive_engine_array() {
    let mut array = MetadataArray::new();
    array.push(&b"trace-bin"[..], Bytes::from_static(&[0xff, 0x00, 0x80]));
    array.push(&b"x-plain"[..], &b"text"[..]);

    let map = fill_metadata_map(array);
    assert_eq!(map.get("trace-bin"), Some(&[0xffu8, 0x00, 0x80][..]));
    assert_eq!(map.get_str("trace-bin"), None);
    assert_eq!(map.get_str("x-plain"), Some("text"));
}

#[test]
fn randomized_binary_values_round_trip() {
    for _ in 0..50 {
        let mut map = MetadataMap::new();
        for i in 0..fastrand::usize(1..8) {
            let value: Vec<u8> = (0..fastrand::usize(0..24)).map(|_| fastrand::u8(..)).collect();
            map.insert(format!("k{i}-bin"), value);
        }
        let echoed = fill_metadata_map(fill_metadata_array(&map));
        assert_eq!(echoed, map);
    }
}
