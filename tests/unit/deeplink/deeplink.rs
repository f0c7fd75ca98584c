use super::*;

#[test]
fn encodes_link_url_with_index() {
    let link = DeepLink::LinkUrl {
        url: "https://example.com/a b?x=1&y=2".to_owned(),
        id: "https://example.com/w.json".to_owned(),
        index: Some(2),
    };
    assert_eq!(
        link.to_url(),
        "widget://link_url?url=https%3A%2F%2Fexample.com%2Fa%20b%3Fx%3D1%26y%3D2&id=https%3A%2F%2Fexample.com%2Fw.json&index=2"
    );
    assert_eq!(DeepLink::parse(&link.to_url()).unwrap(), link);
}

#[test]
fn launch_and_add_widget_parse_back() {
    let launch = DeepLink::LaunchUrl {
        url: "https://wd.gt/".to_owned(),
        id: "sample".to_owned(),
    };
    assert_eq!(launch.to_url(), "widget://launch_url?url=https%3A%2F%2Fwd.gt%2F&id=sample");
    assert_eq!(DeepLink::parse(&launch.to_url()).unwrap(), launch);

    let add = DeepLink::AddWidget {
        url: "https://example.com/w.json".to_owned(),
        user: Some("ann".to_owned()),
        password: Some("p@ss word".to_owned()),
    };
    assert_eq!(DeepLink::parse(&add.to_url()).unwrap(), add);
}

#[test]
fn parse_tolerates_missing_parameters() {
    assert_eq!(
        DeepLink::parse("widget://link_url?url=x&index=abc").unwrap(),
        DeepLink::LinkUrl {
            url: "x".to_owned(),
            id: String::new(),
            index: None
        }
    );
    assert_eq!(
        DeepLink::parse("widget://add_widget?url=https://example.com/w.json").unwrap(),
        DeepLink::AddWidget {
            url: "https://example.com/w.json".to_owned(),
            user: None,
            password: None
        }
    );
}

#[test]
fn parse_rejects_foreign_urls() {
    assert!(DeepLink::parse("https://example.com").is_err());
    assert!(DeepLink::parse("widget://explode?url=x").is_err());
}

#[test]
fn normalize_unwraps_share_links() {
    assert_eq!(
        normalize_widget_input("  https://example.com/w.json \n"),
        "https://example.com/w.json"
    );
    assert_eq!(
        normalize_widget_input("widget://add_widget?url=https%3A%2F%2Fexample.com%2Fw.json"),
        "https://example.com/w.json"
    );
    assert_eq!(normalize_widget_input("widget://???"), "widget://???");
}

#[test]
fn percent_codec_edges() {
    assert_eq!(percent_encode("aZ0-._~"), "aZ0-._~");
    assert_eq!(percent_encode("é"), "%C3%A9");
    assert_eq!(percent_decode("%C3%A9"), "é");
    assert_eq!(percent_decode("100%"), "100%");
    assert_eq!(percent_decode("%zz%4"), "%zz%4");
    assert_eq!(percent_encode_path("/a b/c"), "/a%20b/c");
}
