//! Unit tests for core DNS types.
//!
//! Tests Label, DomainName, Ttl, RecordType and the name helpers.

use dnsmock::types::{
    is_within_zone, names_equal, normalize_name, reversed_label_key, DomainName, Label,
    RecordType, Ttl, MAX_TTL,
};
use dnsmock::RecordData;

#[test]
fn test_label_size() {
    // Label should be exactly 64 bytes (1 len + 63 data)
    assert_eq!(std::mem::size_of::<Label>(), 64);
}

#[test]
fn test_label_is_copy() {
    fn assert_copy<T: Copy>() {}
    assert_copy::<Label>();
}

#[test]
fn test_domain_name_size() {
    // DomainName should be exactly 256 bytes (1 len + 255 data)
    assert_eq!(std::mem::size_of::<DomainName>(), 256);
}

#[test]
fn test_ttl_size() {
    assert_eq!(std::mem::size_of::<Ttl>(), 4);
}

#[test]
fn test_label_creation() {
    let label = Label::from_str("example").unwrap();
    assert_eq!(label.len(), 7);
    assert_eq!(label.as_str(), Some("example"));

    // Too long
    let long = "a".repeat(64);
    assert!(Label::from_str(&long).is_none());

    // Max length is OK
    let max = "a".repeat(63);
    assert!(Label::from_str(&max).is_some());
}

#[test]
fn test_domain_name_creation() {
    let domain = DomainName::from_dotted("example.com").unwrap();
    assert_eq!(domain.to_dotted(), "example.com");

    let domain = DomainName::from_dotted("foo.bar.testdns.aws.com.").unwrap();
    assert_eq!(domain.to_dotted(), "foo.bar.testdns.aws.com");
    assert_eq!(domain.labels().len(), 5);

    // Root domain
    let root = DomainName::from_dotted("").unwrap();
    assert!(root.is_root());

    assert!(DomainName::from_dotted("a..b").is_none());
}

#[test]
fn test_ttl_clamping() {
    let ttl = Ttl::new(u32::MAX);
    assert_eq!(ttl.as_secs(), MAX_TTL);

    let ttl = Ttl::new(3600);
    assert_eq!(ttl.as_secs(), 3600);

    assert_eq!(Ttl::parse(" 600 "), Some(Ttl::new(600)));
    assert_eq!(Ttl::parse("-1"), None);
    assert_eq!(Ttl::parse("ten"), None);
}

#[test]
fn test_record_type_roundtrip() {
    assert_eq!(RecordType::from_u16(1), Some(RecordType::A));
    assert_eq!(RecordType::A.as_u16(), 1);
    assert_eq!(RecordType::A.as_str(), "A");
    assert_eq!(RecordType::from_str("cname"), Some(RecordType::CNAME));
    assert_eq!(RecordType::from_str("ALIAS"), None);

    for record_type in RecordType::ALL {
        assert_eq!(RecordType::from_str(record_type.as_str()), Some(record_type));
        assert_eq!(RecordType::from_u16(record_type.as_u16()), Some(record_type));
    }
}

#[test]
fn test_name_helpers() {
    assert_eq!(normalize_name("Foo.Example.COM."), "foo.example.com");
    assert!(names_equal("example.com.", "EXAMPLE.com"));
    assert!(is_within_zone("foo.bar.testdns.aws.com", "testdns.aws.com."));
    assert!(is_within_zone("testdns.aws.com", "testdns.aws.com"));
    assert!(!is_within_zone("nottestdns.aws.com", "testdns.aws.com"));
    assert_eq!(reversed_label_key("a.example.com."), ["com", "example", "a"]);
    assert!(reversed_label_key("z.example.com") < reversed_label_key("example-x.com"));
}

#[test]
fn test_record_data_values() {
    let mx = RecordData::from_raw("MX", "10 mail.example.com");
    assert_eq!(mx.get_type(), "MX");
    assert_eq!(mx.get_value(), "10 mail.example.com");
    assert_eq!(mx.get_api_value(), "mail.example.com");
    assert_eq!(mx.to_string(), "MX 10 mail.example.com");

    let bad = RecordData::from_raw("AAAA", "1.2.3.4");
    assert_eq!(
        bad,
        RecordData::Other {
            typ: "AAAA".to_string(),
            value: "1.2.3.4".to_string()
        }
    );
}

#[test]
fn test_no_drop_for_copy_types() {
    fn assert_no_drop<T: Copy>() {
        // Copy types cannot have Drop
    }
    assert_no_drop::<Label>();
    assert_no_drop::<Ttl>();
    assert_no_drop::<RecordType>();
}
