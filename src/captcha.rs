//! Captcha acquisition for the STC service.
//!
//! The SII captcha endpoint returns its own answer in-band: the solution is
//! a 4-character slice of the base64-decoded `txtCaptcha` blob. The offset is
//! tied to the current response format of the service and will break if the
//! blob layout changes.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;

use crate::error::{Result, StcError};
use crate::models::{CaptchaResponse, Challenge};

/// Default captcha endpoint.
pub const CAPTCHA_URL: &str = "https://zeus.sii.cl/cvc_cgi/stc/CViewCaptcha.cgi";

/// Character range of the solution inside the decoded blob.
const SOLUTION_START: usize = 36;
const SOLUTION_END: usize = 40;

/// Standard alphabet, padding optional, non-canonical trailing bits accepted.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode the blob, ignoring line breaks and replacing invalid UTF-8.
fn decode_blob(blob: &str) -> Result<String> {
    let compact: String = blob.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = LENIENT.decode(compact.as_bytes())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

impl Challenge {
    /// Build a challenge from the base64 blob returned by the service.
    pub fn from_encoded(challenge_text: impl Into<String>) -> Result<Self> {
        let challenge_text = challenge_text.into();
        let decoded = decode_blob(&challenge_text)?;

        let solution_code: String = decoded
            .chars()
            .skip(SOLUTION_START)
            .take(SOLUTION_END - SOLUTION_START)
            .collect();

        if solution_code.chars().count() != SOLUTION_END - SOLUTION_START {
            return Err(StcError::InvalidResponse(format!(
                "Captcha text too short: {} characters",
                decoded.chars().count()
            )));
        }

        Ok(Self {
            challenge_text,
            solution_code,
        })
    }
}

impl TryFrom<CaptchaResponse> for Challenge {
    type Error = StcError;

    fn try_from(response: CaptchaResponse) -> Result<Self> {
        Challenge::from_encoded(response.txt_captcha)
    }
}
