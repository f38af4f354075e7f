use qipc_decode::*;

fn symbol_vector(attr: u8, symbols: &[&str]) -> Vec<u8> {
    let mut out = vec![11u8, attr];
    out.extend_from_slice(&(symbols.len() as i32).to_le_bytes());
    for s in symbols {
        out.extend_from_slice(s.as_bytes());
        out.push(0);
    }
    out
}

fn long_vector(attr: u8, values: &[i64]) -> Vec<u8> {
    let mut out = vec![7u8, attr];
    out.extend_from_slice(&(values.len() as i32).to_le_bytes());
    for v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

fn date_vector(attr: u8, values: &[i32]) -> Vec<u8> {
    let mut out = vec![14u8, attr];
    out.extend_from_slice(&(values.len() as i32).to_le_bytes());
    for v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

fn general_list(items: &[Vec<u8>]) -> Vec<u8> {
    let mut out = vec![0u8, 0u8];
    out.extend_from_slice(&(items.len() as i32).to_le_bytes());
    for item in items {
        out.extend_from_slice(item);
    }
    out
}

fn dict(keys: Vec<u8>, values: Vec<u8>) -> Vec<u8> {
    let mut out = vec![99u8];
    out.extend(keys);
    out.extend(values);
    out
}

fn table(keys: Vec<u8>, values: Vec<u8>) -> Vec<u8> {
    let mut out = vec![98u8, 0u8];
    out.extend(dict(keys, values));
    out
}

fn decode_body(body: Vec<u8>, options: ReadOptions) -> Body {
    let header = Header {
        endian: Endian::Little,
        kind: MessageKind::Async,
        compressed: false,
        total_size: (8 + body.len()) as u32,
    };
    let mut src = body.as_slice();
    read_data(&mut src, &header, options).expect("well-formed test fixture should decode")
}

#[test]
fn decodes_symbol_vector() {
    let body = symbol_vector(0, &["the", "quick", "brown", "fox"]);
    match decode_body(body, ReadOptions::default()) {
        Body::Value(Value::Vector { data, .. }) => {
            assert_eq!(
                data,
                Vector::Symbol(
                    vec!["the", "quick", "brown", "fox"]
                        .into_iter()
                        .map(String::from)
                        .collect()
                )
            );
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn decodes_all_null_symbol_vector() {
    let body = symbol_vector(0, &["", "", ""]);
    match decode_body(body, ReadOptions::default()) {
        Body::Value(Value::Vector {
            data: Vector::Symbol(syms),
            ..
        }) => {
            assert_eq!(syms.len(), 3);
            assert!(syms.iter().all(|s| s.is_empty()));
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn decodes_guid_atom() {
    // atom code -2, a non-null GUID.
    let mut body = vec![0xFEu8];
    let guid: [u8; 16] = [
        0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F,
        0x10,
    ];
    body.extend_from_slice(&guid);
    match decode_body(body, ReadOptions::default()) {
        Body::Value(Value::Atom(Atom::Guid(g))) => assert_eq!(g, guid),
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn decodes_char_null_atom() {
    // atom code -10 (char), payload is the char null (space).
    let body = vec![0xF6u8, b' '];
    match decode_body(body, ReadOptions::default()) {
        Body::Value(Value::Atom(atom @ Atom::Char(_))) => assert!(atom.is_null()),
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn decodes_boolean_vector() {
    let mut body = vec![1u8, 0]; // type 1, attribute none
    body.extend_from_slice(&3i32.to_le_bytes());
    body.extend_from_slice(&[1, 0, 1]);
    match decode_body(body, ReadOptions::default()) {
        Body::Value(Value::Vector {
            data: Vector::Boolean(bits),
            ..
        }) => assert_eq!(bits, vec![true, false, true]),
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn decodes_simple_table() {
    let body = table(
        symbol_vector(0, &["a", "b"]),
        general_list(&[
            long_vector(0, &[1, 2]),
            long_vector(0, &[10, 20]),
        ]),
    );
    match decode_body(body, ReadOptions::default()) {
        Body::Value(Value::Table { columns, data }) => {
            assert_eq!(columns, vec!["a".to_string(), "b".to_string()]);
            assert_eq!(data.len(), 2);
            assert_eq!(
                data[0],
                Value::Vector {
                    attribute: Attribute::None,
                    data: Vector::Long(vec![1, 2]),
                }
            );
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn decodes_keyed_table() {
    // ([eid:1001 1002 1003] pos:`d1`d2`d3;dates:(2001.01.01;2000.05.01;0Nd))
    let keys_table = table(
        symbol_vector(0, &["eid"]),
        general_list(&[long_vector(0, &[1001, 1002, 1003])]),
    );
    let values_table = table(
        symbol_vector(0, &["pos", "dates"]),
        general_list(&[
            symbol_vector(0, &["d1", "d2", "d3"]),
            date_vector(0, &[366, 121, i32::MIN]),
        ]),
    );
    let body = dict(keys_table, values_table);

    match decode_body(body, ReadOptions::default()) {
        Body::Value(Value::KeyedTable { keys, values }) => {
            match *keys {
                Value::Table { columns, data } => {
                    assert_eq!(columns, vec!["eid".to_string()]);
                    assert_eq!(
                        data[0],
                        Value::Vector {
                            attribute: Attribute::None,
                            data: Vector::Long(vec![1001, 1002, 1003]),
                        }
                    );
                }
                other => panic!("expected key table, got {:?}", other),
            }
            match *values {
                Value::Table { columns, data } => {
                    assert_eq!(columns, vec!["pos".to_string(), "dates".to_string()]);
                    assert_eq!(
                        data[0],
                        Value::Vector {
                            attribute: Attribute::None,
                            data: Vector::Symbol(
                                vec!["d1", "d2", "d3"].into_iter().map(String::from).collect()
                            ),
                        }
                    );
                    assert_eq!(
                        data[1],
                        Value::Vector {
                            attribute: Attribute::None,
                            data: Vector::Date(vec![366, 121, i32::MIN]),
                        }
                    );
                }
                other => panic!("expected value table, got {:?}", other),
            }
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn decodes_keyed_table_in_universal_temporal_mode() {
    let keys_table = table(
        symbol_vector(0, &["eid"]),
        general_list(&[long_vector(0, &[1001, 1002, 1003])]),
    );
    let values_table = table(
        symbol_vector(0, &["pos", "dates"]),
        general_list(&[
            symbol_vector(0, &["d1", "d2", "d3"]),
            date_vector(0, &[366, 121, i32::MIN]),
        ]),
    );
    let body = dict(keys_table, values_table);

    let options = ReadOptions {
        numpy_temporals: true,
        ..ReadOptions::default()
    };
    match decode_body(body, options) {
        Body::Value(Value::KeyedTable { values, .. }) => match *values {
            Value::Table { data, .. } => match &data[1] {
                Value::TemporalVector { qtype: 14, data, .. } => {
                    assert_eq!(
                        data[0],
                        UniversalTemporal::Date(chrono::NaiveDate::from_ymd_opt(2001, 1, 1))
                    );
                    assert_eq!(data[2], UniversalTemporal::Date(None));
                }
                other => panic!("expected a temporal date column, got {:?}", other),
            },
            other => panic!("expected value table, got {:?}", other),
        },
        other => panic!("unexpected: {:?}", other),
    }
}

fn trivial_compress(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for chunk in data.chunks(8) {
        out.push(0u8);
        out.extend_from_slice(chunk);
    }
    out
}

#[test]
fn reads_compressed_frame_with_many_repeated_symbols() {
    let decompressed_body = symbol_vector(0, &vec!["q"; 1000]);
    let compressed = trivial_compress(&decompressed_body);

    let uncompressed_length = 8 + decompressed_body.len();
    let mut body = Vec::new();
    body.extend_from_slice(&(uncompressed_length as u32).to_le_bytes());
    body.extend_from_slice(&compressed);

    let header = Header {
        endian: Endian::Little,
        kind: MessageKind::Async,
        compressed: true,
        total_size: (8 + body.len()) as u32,
    };
    let mut src = body.as_slice();
    match read_data(&mut src, &header, ReadOptions::default()).unwrap() {
        Body::Value(Value::Vector {
            data: Vector::Symbol(syms),
            ..
        }) => {
            assert_eq!(syms.len(), 1000);
            assert!(syms.iter().all(|s| s == "q"));
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn decompressed_and_uncompressed_frames_agree() {
    let decompressed_body = long_vector(0, &[1, 2, 3, 4, 5]);
    let compressed = trivial_compress(&decompressed_body);
    let uncompressed_length = 8 + decompressed_body.len();

    let mut compressed_body = Vec::new();
    compressed_body.extend_from_slice(&(uncompressed_length as u32).to_le_bytes());
    compressed_body.extend_from_slice(&compressed);

    let compressed_header = Header {
        endian: Endian::Little,
        kind: MessageKind::Async,
        compressed: true,
        total_size: (8 + compressed_body.len()) as u32,
    };
    let mut csrc = compressed_body.as_slice();
    let compressed_result =
        read_data(&mut csrc, &compressed_header, ReadOptions::default()).unwrap();

    let plain_result = decode_body(decompressed_body, ReadOptions::default());

    assert_eq!(compressed_result, plain_result);
}

#[test]
fn end_to_end_type_exception() {
    // 1+`: a q type error.
    let frame: Vec<u8> = {
        let mut body = vec![0x80u8];
        body.extend_from_slice(b"type");
        body.push(0);

        let mut frame = vec![1u8, 1, 0, 0];
        frame.extend_from_slice(&((8 + body.len()) as u32).to_le_bytes());
        frame.extend(body);
        frame
    };
    let mut src = frame.as_slice();
    let err = read(&mut src, ReadOptions::default()).unwrap_err();
    match err {
        DecoderError::QException(msg) => assert_eq!(msg, "type"),
        other => panic!("expected QException, got {:?}", other),
    }
}

#[test]
fn end_to_end_projection() {
    // {x+y}[3]
    let body: Vec<u8> = {
        let mut b = vec![104u8];
        b.extend_from_slice(&2i32.to_le_bytes());
        b.push(100); // lambda
        b.push(0); // empty namespace
        b.push(10); // char vector type
        b.push(0); // attribute
        b.extend_from_slice(&5i32.to_le_bytes());
        b.extend_from_slice(b"{x+y}");
        b.push(0xF9); // long atom
        b.extend_from_slice(&3i64.to_le_bytes());
        b
    };

    let header = Header {
        endian: Endian::Little,
        kind: MessageKind::Async,
        compressed: false,
        total_size: (8 + body.len()) as u32,
    };
    let mut src = body.as_slice();
    match read_data(&mut src, &header, ReadOptions::default()).unwrap() {
        Body::Value(Value::Projection(items)) => {
            assert_eq!(items.len(), 2);
            assert_eq!(
                items[0],
                Value::Lambda(Lambda {
                    namespace: String::new(),
                    body: "{x+y}".to_string(),
                })
            );
            assert_eq!(items[1], Value::Atom(Atom::Long(3)));
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn truncated_vector_is_reported() {
    // claims 10 longs but supplies none
    let mut body = vec![7u8, 0];
    body.extend_from_slice(&10i32.to_le_bytes());
    match decode_body_err(body) {
        DecoderError::TruncatedPayload { .. } => {}
        other => panic!("expected TruncatedPayload, got {:?}", other),
    }
}

fn decode_body_err(body: Vec<u8>) -> DecoderError {
    let header = Header {
        endian: Endian::Little,
        kind: MessageKind::Async,
        compressed: false,
        total_size: (8 + body.len()) as u32,
    };
    let mut src = body.as_slice();
    read_data(&mut src, &header, ReadOptions::default()).unwrap_err()
}

#[test]
fn header_shorter_than_eight_bytes_is_malformed() {
    let bytes: &[u8] = &[1, 0, 0, 0, 4, 0, 0, 0];
    let mut src = bytes;
    match read_header(&mut src) {
        Err(DecoderError::MalformedHeader(_)) => {}
        other => panic!("expected MalformedHeader, got {:?}", other),
    }
}
