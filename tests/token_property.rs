//! Codec properties over generated claim sets

use chrono::Utc;
use mentora_auth::token::codec::{TokenCodec, TokenError};
use mentora_auth::token::{TokenClaims, TokenKind};
use proptest::prelude::*;
use uuid::Uuid;

const SECRET: &str = "a-string-secret-at-least-256-bits-long";

prop_compose! {
	fn arb_claims()(
		name in "[A-Za-z0-9 ]{1,20}",
		email in proptest::option::of("[a-z]{1,10}@example\\.com"),
		contact_id in proptest::option::of("@[a-z]{1,10}"),
		roles in prop::collection::vec("(USER|ADVISOR|MANAGER|MASTER)", 1..3),
		ttl_secs in 1i64..86_400,
		is_refresh in any::<bool>(),
	) -> TokenClaims {
		let now = Utc::now().timestamp();
		TokenClaims {
			sub: Uuid::new_v4().to_string(),
			jti: Uuid::new_v4().to_string(),
			name,
			email,
			contact_id,
			roles,
			kind: if is_refresh { TokenKind::Refresh } else { TokenKind::Access },
			iat: now,
			exp: now + ttl_secs,
		}
	}
}

proptest! {
	#[test]
	fn round_trip_preserves_claims(claims in arb_claims()) {
		let codec = TokenCodec::new(SECRET);
		let token = codec.issue(&claims).unwrap();
		let parsed = codec.parse(&token).unwrap();
		prop_assert_eq!(parsed, claims);
	}

	#[test]
	fn foreign_secret_never_verifies(claims in arb_claims(), secret in "[a-z0-9]{32,48}") {
		let codec = TokenCodec::new(SECRET);
		let token = codec.issue(&claims).unwrap();

		// The generated alphabet cannot produce SECRET (no hyphens).
		let other = TokenCodec::new(&secret);
		prop_assert_eq!(other.parse(&token), Err(TokenError::InvalidSignature));
	}

	#[test]
	fn expired_claims_always_rejected(claims in arb_claims(), age_secs in 1i64..86_400) {
		let mut claims = claims;
		claims.exp = Utc::now().timestamp() - age_secs;
		claims.iat = claims.exp - 60;

		let codec = TokenCodec::new(SECRET);
		let token = codec.issue(&claims).unwrap();
		prop_assert_eq!(codec.parse(&token), Err(TokenError::Expired));
	}

	#[test]
	fn spliced_tokens_are_rejected(a in arb_claims(), b in arb_claims()) {
		let codec = TokenCodec::new(SECRET);
		let token_a = codec.issue(&a).unwrap();
		let token_b = codec.issue(&b).unwrap();

		// Payload of one token under the signature of another.
		let parts_a: Vec<&str> = token_a.split('.').collect();
		let parts_b: Vec<&str> = token_b.split('.').collect();
		let forged = format!("{}.{}.{}", parts_a[0], parts_b[1], parts_a[2]);
		prop_assert!(codec.parse(&forged).is_err());
	}
}
