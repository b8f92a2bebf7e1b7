use vpack::{Builder, Slice, Value, VPackError, ValueType};

#[test]
fn empty_input_reads_as_none() {
    let slice = Slice::new(&[]);
    assert!(slice.is_none());
    assert_eq!(slice.value_type(), ValueType::None);
    assert!(slice.byte_size().is_err());
}

#[test]
fn none_slice_is_distinct_from_null() {
    assert!(Slice::none().is_none());
    assert!(!Slice::new(&[0x18]).is_none());
    assert!(Slice::new(&[0x18]).is_null());
}

#[test]
fn type_predicates() {
    assert!(Slice::new(&[0x1a]).is_bool());
    assert!(Slice::new(&[0x31]).is_small_int());
    assert!(Slice::new(&[0x31]).is_integer());
    assert!(Slice::new(&[0x29, 0xd2, 0x04]).is_uint());
    assert!(Slice::new(&[0x29, 0xd2, 0x04]).is_number());
    assert!(Slice::new(&[0x43, b'a', b'b', b'c']).is_string());
    assert!(Slice::new(&[0x01]).is_array());
    assert!(Slice::new(&[0x0a]).is_object());
    assert!(Slice::new(&[0x01]).is_empty_compound());
    assert!(Slice::new(&[0x1e]).is_min_key());
    assert!(Slice::new(&[0x1f]).is_max_key());
    assert_eq!(Slice::new(&[0x17]).value_type(), ValueType::Illegal);
}

#[test]
fn scalar_byte_sizes_match_encoded_length() {
    let cases: Vec<Vec<u8>> = vec![
        vec![0x18],
        vec![0x19],
        vec![0x31],
        vec![0x3f],
        vec![0x29, 0xd2, 0x04],
        vec![0x20, 0x2a],
        vec![0x43, b'a', b'b', b'c'],
        vec![0xc0, 0x02, 0xaa, 0xbb],
    ];
    for bytes in cases {
        assert_eq!(
            Slice::new(&bytes).byte_size().unwrap(),
            bytes.len(),
            "bytes {bytes:x?}"
        );
    }
}

#[test]
fn small_int_values() {
    for v in 0..=9i64 {
        let head = 0x30 + v as u8;
        assert_eq!(Slice::new(&[head]).get_small_int().unwrap(), v);
    }
    for v in -6..=-1i64 {
        let head = (0x40 + v) as u8;
        assert_eq!(Slice::new(&[head]).get_small_int().unwrap(), v);
    }
}

#[test]
fn integer_cross_acceptance() {
    let uint = [0x29u8, 0xd2, 0x04];
    assert_eq!(Slice::new(&uint).get_int().unwrap(), 1234);
    assert_eq!(Slice::new(&uint).get_small_int().unwrap(), 1234);

    let int = [0x20u8, 0xfe];
    assert_eq!(Slice::new(&int).get_int().unwrap(), -2);
    assert!(matches!(
        Slice::new(&int).get_uint(),
        Err(VPackError::NumberOutOfRange(_))
    ));

    let huge = [0x2fu8, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
    assert!(matches!(
        Slice::new(&huge).get_int(),
        Err(VPackError::NumberOutOfRange(_))
    ));
}

#[test]
fn type_mismatch_is_a_typed_error() {
    let double = [0x1bu8, 0, 0, 0, 0, 0, 0, 0, 0];
    assert!(matches!(
        Slice::new(&double).get_bool(),
        Err(VPackError::InvalidValueType(_))
    ));
    assert!(matches!(
        Slice::new(&[0x18]).get_double(),
        Err(VPackError::InvalidValueType(_))
    ));
    assert!(matches!(
        Slice::new(&[0x18]).get_str(),
        Err(VPackError::InvalidValueType(_))
    ));
    assert!(matches!(
        Slice::new(&[0x18]).length(),
        Err(VPackError::InvalidValueType(_))
    ));
    assert!(matches!(
        Slice::new(&[0x18]).at(0),
        Err(VPackError::InvalidValueType(_))
    ));
    assert!(matches!(
        Slice::new(&[0x18]).get("x"),
        Err(VPackError::InvalidValueType(_))
    ));
}

#[test]
fn truncated_values_never_read_past_the_end() {
    // Two-byte uint with a missing body byte.
    let truncated = [0x29u8, 0xd2];
    assert!(Slice::new(&truncated).get_uint().is_err());

    // Array claiming five bytes with only three present.
    let truncated = [0x02u8, 0x05, 0x31];
    assert!(Slice::new(&truncated).at(0).is_err());

    // Long string with a huge declared length.
    let truncated = [0xbfu8, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f];
    assert!(Slice::new(&truncated).get_str().is_err());

    // Compact array cut off inside its size varint.
    let truncated = [0x13u8, 0x80];
    assert!(Slice::new(&truncated).byte_size().is_err());
}

#[test]
fn at_out_of_bounds() {
    let mut b = Builder::new();
    b.open_array(false).unwrap();
    b.add(Value::Int(1)).unwrap();
    b.add(Value::Int(2)).unwrap();
    b.close().unwrap();
    let bytes = b.slice().unwrap().raw_bytes().to_vec();

    let slice = Slice::new(&bytes);
    assert!(slice.at(1).is_ok());
    assert!(matches!(
        slice.at(2),
        Err(VPackError::IndexOutOfBounds { index: 2, len: 2 })
    ));

    let empty = Slice::new(&[0x01]);
    assert!(matches!(
        empty.at(0),
        Err(VPackError::IndexOutOfBounds { index: 0, len: 0 })
    ));
}

#[test]
fn sorted_object_binary_search() {
    let keys = [
        "alpha", "beta", "delta", "epsilon", "eta", "gamma", "iota", "kappa", "lambda", "mu",
        "nu", "omega", "pi", "rho", "sigma", "tau", "theta", "xi", "zeta",
    ];
    let mut b = Builder::new();
    b.open_object(false).unwrap();
    // Insert in reverse to prove ordering comes from the index.
    for (i, key) in keys.iter().enumerate().rev() {
        b.add_keyed(key, Value::Int(i as i64)).unwrap();
    }
    b.close().unwrap();

    let slice = b.slice().unwrap();
    assert_eq!(slice.length().unwrap(), keys.len());
    for (i, key) in keys.iter().enumerate() {
        assert_eq!(slice.get(key).unwrap().get_int().unwrap(), i as i64, "{key}");
    }
    assert!(slice.get("nonexistent").unwrap().is_none());
    assert!(slice.get("").unwrap().is_none());
    assert!(slice.get("zzz").unwrap().is_none());

    // Keys in the index are strictly increasing.
    let mut previous = Vec::new();
    for i in 0..keys.len() {
        let key = slice.key_at(i).unwrap().get_str().unwrap().as_bytes().to_vec();
        assert!(previous < key);
        previous = key;
    }
}

#[test]
fn get_on_empty_object_returns_none() {
    let slice = Slice::new(&[0x0a]);
    assert!(slice.get("anything").unwrap().is_none());
    assert!(!slice.has_key("anything").unwrap());
}

#[test]
fn array_iteration_over_indexed_layout() {
    let mut b = Builder::new();
    b.open_array(false).unwrap();
    b.add(Value::from("one")).unwrap();
    b.add(Value::Int(2)).unwrap();
    b.add(Value::Bool(true)).unwrap();
    b.close().unwrap();

    let slice = b.slice().unwrap();
    let members: Vec<Slice<'_>> = slice.array_iter().unwrap().map(|m| m.unwrap()).collect();
    assert_eq!(members.len(), 3);
    assert_eq!(members[0].get_str().unwrap(), "one");
    assert_eq!(members[1].get_int().unwrap(), 2);
    assert!(members[2].get_bool().unwrap());

    assert!(Slice::new(&[0x18]).array_iter().is_err());
    assert_eq!(Slice::new(&[0x01]).array_iter().unwrap().count(), 0);
}

#[test]
fn object_iteration_yields_pairs_in_stored_order() {
    let mut b = Builder::new();
    b.open_object(false).unwrap();
    b.add_keyed("b", Value::Int(2)).unwrap();
    b.add_keyed("a", Value::Int(1)).unwrap();
    b.add_keyed("c", Value::Int(3)).unwrap();
    b.close().unwrap();

    let slice = b.slice().unwrap();
    let entries: Vec<(String, i64)> = slice
        .object_iter()
        .unwrap()
        .map(|entry| {
            let (key, value) = entry.unwrap();
            (key.get_str().unwrap().to_owned(), value.get_int().unwrap())
        })
        .collect();
    // Entries iterate in payload order (insertion order), the index only
    // reorders lookups.
    assert_eq!(
        entries,
        vec![
            ("b".to_owned(), 2),
            ("a".to_owned(), 1),
            ("c".to_owned(), 3)
        ]
    );
}

#[test]
fn accepts_padding_between_size_field_and_members() {
    // Encoders that skip the shift leave zero padding after a narrow size
    // field; offset 9 is then the first member.
    let padded = [
        0x03u8, 0x0b, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x31, 0x32,
    ];
    let slice = Slice::new(&padded);
    assert_eq!(slice.byte_size().unwrap(), 11);
    assert_eq!(slice.length().unwrap(), 2);
    assert_eq!(slice.at(0).unwrap().get_int().unwrap(), 1);
    assert_eq!(slice.at(1).unwrap().get_int().unwrap(), 2);
}

#[test]
fn value_round_trip_through_bytes() {
    // encode -> decode -> encode again gives identical bytes when the same
    // layout decisions apply.
    let mut b = Builder::new();
    b.open_object(false).unwrap();
    b.add_keyed("nested", Value::Array(false)).unwrap();
    b.add(Value::Double(-134.494401)).unwrap();
    b.add(Value::from("the quick brown FOX")).unwrap();
    b.add(Value::Null).unwrap();
    b.close().unwrap();
    b.add_keyed("when", Value::UtcDate(1700000000000)).unwrap();
    b.close().unwrap();

    let first = b.slice().unwrap().raw_bytes().to_vec();

    let mut rebuilt = Builder::new();
    let source = Slice::new(&first);
    rebuilt.open_object(false).unwrap();
    let nested = source.get("nested").unwrap();
    rebuilt.add_keyed("nested", Value::Array(false)).unwrap();
    rebuilt
        .add(Value::Double(nested.at(0).unwrap().get_double().unwrap()))
        .unwrap();
    rebuilt
        .add(Value::from(nested.at(1).unwrap().get_str().unwrap()))
        .unwrap();
    rebuilt.add(Value::Null).unwrap();
    rebuilt.close().unwrap();
    rebuilt
        .add_keyed(
            "when",
            Value::UtcDate(source.get("when").unwrap().get_utc_date().unwrap()),
        )
        .unwrap();
    rebuilt.close().unwrap();

    assert_eq!(rebuilt.slice().unwrap().raw_bytes(), first.as_slice());
}
