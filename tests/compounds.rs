use vpack::{Builder, Options, Value};

fn double_bytes(v: f64) -> [u8; 8] {
    v.to_bits().to_le_bytes()
}

fn unsorted_options() -> Options {
    Options {
        sort_attribute_names: false,
        ..Options::default()
    }
}

#[test]
fn empty_array() {
    let mut b = Builder::new();
    b.open_array(false).unwrap();
    b.close().unwrap();
    assert_eq!(b.slice().unwrap().raw_bytes(), [0x01]);
    assert_eq!(b.slice().unwrap().byte_size().unwrap(), 1);
    assert_eq!(b.slice().unwrap().length().unwrap(), 0);
}

#[test]
fn empty_object() {
    let mut b = Builder::new();
    b.open_object(false).unwrap();
    b.close().unwrap();
    assert_eq!(b.slice().unwrap().raw_bytes(), [0x0a]);
    assert_eq!(b.slice().unwrap().byte_size().unwrap(), 1);
    assert_eq!(b.slice().unwrap().length().unwrap(), 0);
}

#[test]
fn array_single_small_entry() {
    let mut b = Builder::new();
    b.open_array(false).unwrap();
    b.add(Value::UInt(1)).unwrap();
    b.close().unwrap();
    // Equal-sized members, no offset index.
    assert_eq!(b.slice().unwrap().raw_bytes(), [0x02, 0x03, 0x31]);
}

#[test]
fn array_equal_width_ints() {
    let mut b = Builder::new();
    b.open_array(false).unwrap();
    b.add(Value::UInt(1)).unwrap();
    b.add(Value::UInt(2)).unwrap();
    b.add(Value::UInt(3)).unwrap();
    b.close().unwrap();

    let bytes = b.slice().unwrap().raw_bytes().to_vec();
    assert_eq!(bytes, [0x02, 0x05, 0x31, 0x32, 0x33]);

    let slice = b.slice().unwrap();
    assert_eq!(slice.length().unwrap(), 3);
    for i in 0..3 {
        assert_eq!(slice.at(i).unwrap().get_uint().unwrap(), i as u64 + 1);
    }
}

#[test]
fn array_mixed_sizes_uses_offset_index() {
    let mut b = Builder::new();
    b.open_array(false).unwrap();
    b.add(Value::UInt(1200)).unwrap();
    b.add(Value::Double(2.3)).unwrap();
    b.add(Value::from("abc")).unwrap();
    b.add(Value::Bool(true)).unwrap();
    b.close().unwrap();

    let mut expected = vec![0x06, 0x18, 0x04, 0x29, 0xb0, 0x04, 0x1b];
    expected.extend_from_slice(&double_bytes(2.3));
    expected.extend_from_slice(&[0x43, 0x61, 0x62, 0x63, 0x1a, 0x03, 0x06, 0x0f, 0x13]);
    assert_eq!(b.slice().unwrap().raw_bytes(), expected.as_slice());

    let slice = b.slice().unwrap();
    assert_eq!(slice.length().unwrap(), 4);
    assert_eq!(slice.at(0).unwrap().get_uint().unwrap(), 1200);
    assert_eq!(slice.at(1).unwrap().get_double().unwrap(), 2.3);
    assert_eq!(slice.at(2).unwrap().get_str().unwrap(), "abc");
    assert!(slice.at(3).unwrap().get_bool().unwrap());
}

#[test]
fn array_grows_to_two_byte_offsets() {
    let mut b = Builder::new();
    b.open_array(false).unwrap();
    // Mixed sizes so an index is needed; enough payload to leave the 1-byte
    // total range.
    b.add(Value::Double(0.5)).unwrap();
    for i in 0..130u64 {
        b.add(Value::UInt(240 + i)).unwrap();
    }
    b.close().unwrap();

    let slice = b.slice().unwrap();
    assert_eq!(slice.head(), 0x07);
    assert_eq!(slice.length().unwrap(), 131);
    assert_eq!(slice.at(0).unwrap().get_double().unwrap(), 0.5);
    assert_eq!(slice.at(130).unwrap().get_uint().unwrap(), 369);
}

#[test]
fn object_sorted_layout() {
    let mut b = Builder::new();
    b.open_object(false).unwrap();
    b.add_keyed("d", Value::UInt(1200)).unwrap();
    b.add_keyed("c", Value::Double(2.3)).unwrap();
    b.add_keyed("b", Value::from("abc")).unwrap();
    b.add_keyed("a", Value::Bool(true)).unwrap();
    b.close().unwrap();

    let mut expected = vec![0x0b, 0x20, 0x04, 0x41, 0x64, 0x29, 0xb0, 0x04, 0x41, 0x63, 0x1b];
    expected.extend_from_slice(&double_bytes(2.3));
    expected.extend_from_slice(&[0x41, 0x62, 0x43, 0x61, 0x62, 0x63]);
    expected.extend_from_slice(&[0x41, 0x61, 0x1a]);
    expected.extend_from_slice(&[0x19, 0x13, 0x08, 0x03]);
    assert_eq!(b.slice().unwrap().raw_bytes(), expected.as_slice());

    let slice = b.slice().unwrap();
    assert_eq!(slice.byte_size().unwrap(), 0x20);
    assert_eq!(slice.length().unwrap(), 4);
    // The index is sorted by key, so member order follows a, b, c, d.
    assert_eq!(slice.key_at(0).unwrap().get_str().unwrap(), "a");
    assert_eq!(slice.key_at(3).unwrap().get_str().unwrap(), "d");
    assert!(slice.value_at(0).unwrap().get_bool().unwrap());
    assert_eq!(slice.value_at(3).unwrap().get_uint().unwrap(), 1200);
}

#[test]
fn object_unsorted_layout() {
    let mut b = Builder::with_options(unsorted_options());
    b.open_object(false).unwrap();
    b.add_keyed("d", Value::UInt(1200)).unwrap();
    b.add_keyed("c", Value::Double(2.3)).unwrap();
    b.add_keyed("b", Value::from("abc")).unwrap();
    b.add_keyed("a", Value::Bool(true)).unwrap();
    b.close().unwrap();

    let mut expected = vec![0x0f, 0x20, 0x04, 0x41, 0x64, 0x29, 0xb0, 0x04, 0x41, 0x63, 0x1b];
    expected.extend_from_slice(&double_bytes(2.3));
    expected.extend_from_slice(&[0x41, 0x62, 0x43, 0x61, 0x62, 0x63]);
    expected.extend_from_slice(&[0x41, 0x61, 0x1a]);
    expected.extend_from_slice(&[0x03, 0x08, 0x13, 0x19]);
    assert_eq!(b.slice().unwrap().raw_bytes(), expected.as_slice());

    let slice = b.slice().unwrap();
    // Insertion order is preserved in the index.
    assert_eq!(slice.key_at(0).unwrap().get_str().unwrap(), "d");
    assert_eq!(slice.key_at(3).unwrap().get_str().unwrap(), "a");
    // Lookup still works by linear scan.
    assert_eq!(slice.get("c").unwrap().get_double().unwrap(), 2.3);
    assert!(slice.get("missing").unwrap().is_none());
}

#[test]
fn single_key_object_is_sorted_by_default() {
    let mut b = Builder::new();
    b.open_object(false).unwrap();
    b.add_keyed("foo", Value::from("bar")).unwrap();
    b.close().unwrap();

    let slice = b.slice().unwrap();
    assert_eq!(slice.head(), 0x0b);
    assert_eq!(slice.length().unwrap(), 1);
    assert_eq!(slice.get("foo").unwrap().get_str().unwrap(), "bar");
}

#[test]
fn per_open_sort_override() {
    // Options ask for sorted objects; the override turns it off for one
    // compound only.
    let mut b = Builder::new();
    b.open_array(false).unwrap();
    b.open_object_sorted(false, false).unwrap();
    b.add_keyed("z", Value::Int(1)).unwrap();
    b.add_keyed("a", Value::Int(2)).unwrap();
    b.close().unwrap();
    b.open_object(false).unwrap();
    b.add_keyed("z", Value::Int(1)).unwrap();
    b.add_keyed("a", Value::Int(2)).unwrap();
    b.close().unwrap();
    b.close().unwrap();

    let slice = b.slice().unwrap();
    let unsorted = slice.at(0).unwrap();
    let sorted = slice.at(1).unwrap();
    assert_eq!(unsorted.head(), 0x0f);
    assert_eq!(sorted.head(), 0x0b);
    assert_eq!(unsorted.key_at(0).unwrap().get_str().unwrap(), "z");
    assert_eq!(sorted.key_at(0).unwrap().get_str().unwrap(), "a");
    assert_eq!(unsorted.get("a").unwrap().get_int().unwrap(), 2);
    assert_eq!(sorted.get("a").unwrap().get_int().unwrap(), 2);
}

#[test]
fn object_in_array() {
    let mut b = Builder::new();
    b.open_array(false).unwrap();
    b.open_object(false).unwrap();
    b.close().unwrap();
    b.close().unwrap();

    let slice = b.slice().unwrap();
    assert!(slice.is_array());
    assert_eq!(slice.length().unwrap(), 1);
    let inner = slice.at(0).unwrap();
    assert!(inner.is_object());
    assert_eq!(inner.length().unwrap(), 0);
}

#[test]
fn deep_nesting_round_trip() {
    let mut b = Builder::new();
    for _ in 0..100 {
        b.open_array(false).unwrap();
    }
    b.add(Value::Int(7)).unwrap();
    for _ in 0..100 {
        b.close().unwrap();
    }

    let mut slice = b.slice().unwrap();
    for _ in 0..100 {
        assert!(slice.is_array());
        assert_eq!(slice.length().unwrap(), 1);
        slice = slice.at(0).unwrap();
    }
    assert_eq!(slice.get_int().unwrap(), 7);
}

#[test]
fn member_count_equals_successful_adds() {
    let mut b = Builder::new();
    b.open_array(false).unwrap();
    let mut added = 0usize;
    for i in 0..50 {
        if i % 3 == 0 {
            b.add(Value::from("abcdefgh")).unwrap();
        } else {
            b.add(Value::Int(i)).unwrap();
        }
        added += 1;
    }
    // A rejected add must not count.
    assert!(b.add(Value::SmallInt(99)).is_err());
    b.close().unwrap();

    let slice = b.slice().unwrap();
    assert_eq!(slice.length().unwrap(), added);
    let byte_size = slice.byte_size().unwrap();
    assert_eq!(byte_size, slice.raw_bytes().len());
}

#[test]
fn uniqueness_recheck_at_close_passes_distinct_keys() {
    let options = Options {
        check_attribute_uniqueness: true,
        sort_attribute_names: false,
        ..Options::default()
    };
    let mut b = Builder::with_options(options);
    b.open_object(false).unwrap();
    b.add_keyed("x", Value::Int(1)).unwrap();
    b.add_keyed("y", Value::Int(2)).unwrap();
    b.close().unwrap();
    assert_eq!(b.slice().unwrap().length().unwrap(), 2);
}

#[test]
fn unindexed_options_force_compact_layouts() {
    let options = Options {
        build_unindexed_arrays: true,
        build_unindexed_objects: true,
        ..Options::default()
    };
    let mut b = Builder::with_options(options);
    b.open_array(false).unwrap();
    b.add(Value::Int(1)).unwrap();
    b.close().unwrap();
    assert_eq!(b.slice().unwrap().head(), 0x13);

    let mut b = Builder::with_options(Options {
        build_unindexed_arrays: true,
        build_unindexed_objects: true,
        ..Options::default()
    });
    b.open_object(false).unwrap();
    b.add_keyed("a", Value::Int(1)).unwrap();
    b.close().unwrap();
    assert_eq!(b.slice().unwrap().head(), 0x14);
}
