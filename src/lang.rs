// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Language support: Snowball stemmers by ISO 639-1 code.
//!
//! Non-English stemmers register themselves under `stemmer-<code>` on first
//! use, so a serialized index built for, say, French round-trips through
//! the registry like any other pipeline. Stop word lists beyond English are
//! not shipped; a per-language builder carries trimmer and stemmer only.

use rust_stemmers::{Algorithm, Stemmer};

use crate::error::{Error, Result};
use crate::filters;
use crate::pipeline::{Pipeline, PipelineFunction};
use crate::token::Token;

/// The language codes with a registered Snowball algorithm.
pub const SUPPORTED_LANGUAGES: [&str; 17] = [
    "ar", "da", "de", "en", "es", "fi", "fr", "hu", "it", "nl", "no", "pt", "ro", "ru", "sv",
    "ta", "tr",
];

fn algorithm_for(code: &str) -> Option<Algorithm> {
    match code {
        "ar" => Some(Algorithm::Arabic),
        "da" => Some(Algorithm::Danish),
        "de" => Some(Algorithm::German),
        "en" => Some(Algorithm::English),
        "es" => Some(Algorithm::Spanish),
        "fi" => Some(Algorithm::Finnish),
        "fr" => Some(Algorithm::French),
        "hu" => Some(Algorithm::Hungarian),
        "it" => Some(Algorithm::Italian),
        "nl" => Some(Algorithm::Dutch),
        "no" => Some(Algorithm::Norwegian),
        "pt" => Some(Algorithm::Portuguese),
        "ro" => Some(Algorithm::Romanian),
        "ru" => Some(Algorithm::Russian),
        "sv" => Some(Algorithm::Swedish),
        "ta" => Some(Algorithm::Tamil),
        "tr" => Some(Algorithm::Turkish),
        _ => None,
    }
}

/// The stemmer pipeline function for a language code, registering it under
/// `stemmer-<code>` if this is its first use. English resolves to the
/// built-in `stemmer`.
pub fn language_stemmer(code: &str) -> Result<PipelineFunction> {
    let algorithm = algorithm_for(code).ok_or_else(|| Error::UnknownLanguage {
        code: code.to_string(),
    })?;

    if code == "en" {
        return Ok(filters::stemmer());
    }

    let label = format!("stemmer-{code}");
    if let Some(function) = Pipeline::registered_function(&label) {
        return Ok(function);
    }

    let stemmer = Stemmer::create(algorithm);
    let function = PipelineFunction::new(label, move |mut token: Token, _, _: &[Token]| {
        token.update(|string, _| stemmer.stem(string).into_owned());
        vec![token]
    });
    Pipeline::register_function(function.clone());
    Ok(function)
}
