//! Round-trip tests for share links.

#![allow(missing_docs)]

use playground_compiler::{Version, supports_strip_types};
use playground_config::{ConfigDocument, EsVersion, ModuleKind, Syntax};
use playground_session::restore::restore;
use playground_session::{
    MemoryStore, SessionState, SharedSession, decode_text, encode_text, share_url,
};
use proptest::prelude::*;
use url::Url;

fn config_strategy() -> impl Strategy<Value = ConfigDocument> {
    (
        prop::sample::select(Syntax::all().to_vec()),
        any::<bool>(),
        prop::sample::select(EsVersion::all().to_vec()),
        prop::sample::select(ModuleKind::all().to_vec()),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(syntax, element, target, module, compress, minify)| {
            let mut document = ConfigDocument::default();
            document.set_syntax(syntax).unwrap();
            document.set_jsx_or_tsx(element).unwrap();
            document.set_target(target).unwrap();
            document.set_module_type(module).unwrap();
            document.set_compress(compress).unwrap();
            document.set_minify(minify).unwrap();
            document
        })
}

fn version_strategy() -> impl Strategy<Value = Version> {
    (1u64..2, 0u64..10, 0u64..200).prop_map(|(major, minor, patch)| Version::new(major, minor, patch))
}

proptest! {
    #[test]
    fn text_round_trips(text in any::<String>()) {
        let encoded = encode_text("code", &text).unwrap();
        prop_assert_eq!(decode_text("code", &encoded).unwrap(), text);
    }

    #[test]
    fn session_round_trips(
        code in any::<String>(),
        config in config_strategy(),
        version in version_strategy(),
        strip_types in any::<bool>(),
    ) {
        let mut session = SessionState::new(version);
        session.code = code;
        session.config = config;
        session.strip_types = strip_types && supports_strip_types(&session.version);

        let base = Url::parse("https://play.swc.rs/?lang=en").unwrap();
        let url = share_url(&base, &session).unwrap();
        let shared = SharedSession::from_url(&url);
        let restored = restore(&shared, &MemoryStore::new(), &Version::new(0, 0, 1));

        prop_assert_eq!(restored.state, session);
    }
}

#[test]
fn unicode_and_newlines_survive() {
    let mut session = SessionState::new(Version::new(1, 7, 26));
    session.code = "// 日本語 ✓ \u{1F600}\r\nconst s = `a\n\tb`;\n".to_string();

    let url = share_url(&Url::parse("https://play.swc.rs/").unwrap(), &session).unwrap();
    let shared = SharedSession::from_url(&url);
    assert_eq!(shared.code.as_deref(), Some(session.code.as_str()));
}
