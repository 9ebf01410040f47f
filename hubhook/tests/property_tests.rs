//! Property tests for signature verification and extraction ordering.

use http::Request;
use hubhook::{sign, verify, Algorithm, ExtractionError, Extractor};
use proptest::prelude::*;

fn arb_algorithm() -> impl Strategy<Value = Algorithm> {
    prop_oneof![Just(Algorithm::Sha1), Just(Algorithm::Sha256)]
}

proptest! {
    /// Property: a header produced by `sign` always verifies
    #[test]
    fn proptest_signed_bodies_verify(
        algorithm in arb_algorithm(),
        secret in prop::collection::vec(any::<u8>(), 0..128),
        body in prop::collection::vec(any::<u8>(), 0..512),
    ) {
        let header = sign(algorithm, &secret, &body);
        prop_assert_eq!(header.len(), algorithm.signature_len());
        prop_assert!(verify(algorithm, &secret, &header, &body));
    }

    /// Property: flipping any single bit of the body is detected
    #[test]
    fn proptest_body_bit_flip_rejected(
        algorithm in arb_algorithm(),
        secret in prop::collection::vec(any::<u8>(), 1..64),
        body in prop::collection::vec(any::<u8>(), 1..256),
        index in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let header = sign(algorithm, &secret, &body);
        let mut tampered = body.clone();
        let i = index.index(tampered.len());
        tampered[i] ^= 1 << bit;
        prop_assert!(!verify(algorithm, &secret, &header, &tampered));
    }

    /// Property: flipping any single bit of the secret is detected
    #[test]
    fn proptest_secret_bit_flip_rejected(
        algorithm in arb_algorithm(),
        secret in prop::collection::vec(any::<u8>(), 1..128),
        body in prop::collection::vec(any::<u8>(), 0..256),
        index in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let header = sign(algorithm, &secret, &body);
        let mut wrong = secret.clone();
        let i = index.index(wrong.len());
        wrong[i] ^= 1 << bit;
        prop_assert!(!verify(algorithm, &wrong, &header, &body));
    }

    /// Property: headers of the wrong length never verify
    #[test]
    fn proptest_wrong_length_rejected(
        algorithm in arb_algorithm(),
        body in prop::collection::vec(any::<u8>(), 0..64),
        cut in 1usize..40,
        extra in "[0-9a-f]{1,8}",
    ) {
        let header = sign(algorithm, b"secret", &body);
        let truncated = &header[..header.len() - cut];
        let extended = format!("{header}{extra}");
        prop_assert!(!verify(algorithm, b"secret", truncated, &body));
        prop_assert!(!verify(algorithm, b"secret", &extended, &body));
    }

    /// Property: arbitrary suffixes of the right length never panic or verify
    #[test]
    fn proptest_garbage_suffix_rejected(
        algorithm in arb_algorithm(),
        suffix in "[g-zG-Z!-/ ]{64}",
    ) {
        let hex_len = 2 * algorithm.digest_size();
        let header = format!("{}{}", algorithm.prefix(), &suffix[..hex_len]);
        prop_assert_eq!(header.len(), algorithm.signature_len());
        let verified = verify(algorithm, b"secret", &header, b"{}");
        prop_assert!(!verified);
    }

    /// Property: the first missing field in check order is the one reported
    #[test]
    fn proptest_extraction_is_fail_fast(
        is_post in any::<bool>(),
        has_signature in any::<bool>(),
        has_event in any::<bool>(),
        has_delivery in any::<bool>(),
    ) {
        let mut builder = Request::builder().method(if is_post { "POST" } else { "GET" });
        if has_signature {
            builder = builder.header("x-hub-signature-256", "sig");
        }
        if has_event {
            builder = builder.header("x-github-event", "push");
        }
        if has_delivery {
            builder = builder.header("x-github-delivery", "abc-123");
        }
        let req = builder.body(&b"{}"[..]).unwrap();

        let result = Extractor::for_algorithm(Algorithm::Sha256).extract(req);
        let expected = if !is_post {
            Some("method")
        } else if !has_signature {
            Some("signature")
        } else if !has_event {
            Some("event")
        } else if !has_delivery {
            Some("delivery")
        } else {
            None
        };

        let actual = match result {
            Err(ExtractionError::MethodNotAllowed) => Some("method"),
            Err(ExtractionError::MissingSignature) => Some("signature"),
            Err(ExtractionError::MissingEvent) => Some("event"),
            Err(ExtractionError::MissingDeliveryId) => Some("delivery"),
            Err(ExtractionError::BodyRead(_)) => Some("body"),
            Ok(_) => None,
        };
        prop_assert_eq!(actual, expected);
    }
}
