// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Parsing lexemes into query clauses.
//!
//! A state machine mirroring the lexer's: each state consumes one lexeme
//! and names the legal successors, so error messages can say exactly what
//! was expected. Clauses close when the next lexeme starts a new one (term,
//! field or presence) or the stream ends; edit distance and boost attach to
//! the clause still being built.

use crate::error::{Error, Result};
use crate::query::{Clause, Presence, Query};
use crate::query_lexer::{lex, Lexeme, LexemeKind};

enum State {
    Clause,
    Field,
    Term,
    EditDistance,
    Boost,
    Presence,
}

struct QueryParser<'a> {
    lexemes: Vec<Lexeme>,
    position: usize,
    query: &'a mut Query,
    current_clause: Clause,
}

/// Parse a query string into clauses appended to `query`.
pub(crate) fn parse(string: &str, query: &mut Query) -> Result<()> {
    let parser = QueryParser {
        lexemes: lex(string),
        position: 0,
        query,
        current_clause: Clause::default(),
    };
    parser.parse()
}

impl QueryParser<'_> {
    fn parse(mut self) -> Result<()> {
        let mut state = Some(State::Clause);
        while let Some(current) = state {
            state = match current {
                State::Clause => self.parse_clause()?,
                State::Field => self.parse_field()?,
                State::Term => self.parse_term()?,
                State::EditDistance => self.parse_edit_distance()?,
                State::Boost => self.parse_boost()?,
                State::Presence => self.parse_presence()?,
            };
        }
        Ok(())
    }

    fn peek(&self) -> Option<&Lexeme> {
        self.lexemes.get(self.position)
    }

    fn consume(&mut self) -> Option<Lexeme> {
        let lexeme = self.lexemes.get(self.position).cloned();
        self.position += 1;
        lexeme
    }

    fn next_clause(&mut self) {
        let clause = std::mem::take(&mut self.current_clause);
        self.query.clause(clause);
    }

    fn parse_clause(&mut self) -> Result<Option<State>> {
        let Some(lexeme) = self.peek() else {
            return Ok(None);
        };

        match lexeme.kind {
            LexemeKind::Field => Ok(Some(State::Field)),
            LexemeKind::Term => Ok(Some(State::Term)),
            LexemeKind::Presence => Ok(Some(State::Presence)),
            other => Err(Error::QueryParse {
                message: if lexeme.text.is_empty() {
                    format!("expected either a field or a term, found {}", other)
                } else {
                    format!(
                        "expected either a field or a term, found {} with value {:?}",
                        other, lexeme.text
                    )
                },
            }),
        }
    }

    fn parse_field(&mut self) -> Result<Option<State>> {
        let Some(lexeme) = self.consume() else {
            return Ok(None);
        };

        if !self.query.all_fields.contains(&lexeme.text) {
            return Err(Error::QueryParse {
                message: format!(
                    "unrecognised field {:?}, possible fields: {}",
                    lexeme.text,
                    self.query.all_fields.join(", ")
                ),
            });
        }

        self.current_clause.fields = vec![lexeme.text];

        match self.peek() {
            None => Err(Error::QueryParse {
                message: "expected term, found nothing".to_string(),
            }),
            Some(next) if next.kind == LexemeKind::Term => Ok(Some(State::Term)),
            Some(next) => Err(Error::QueryParse {
                message: format!("expected term, found {}", next.kind),
            }),
        }
    }

    fn parse_term(&mut self) -> Result<Option<State>> {
        let Some(lexeme) = self.consume() else {
            return Ok(None);
        };

        self.current_clause.term = lexeme.text.to_lowercase();
        if lexeme.text.contains('*') {
            self.current_clause.use_pipeline = false;
        }

        self.peek_next_lexeme()
    }

    fn parse_presence(&mut self) -> Result<Option<State>> {
        let Some(lexeme) = self.consume() else {
            return Ok(None);
        };

        self.current_clause.presence = match lexeme.text.as_str() {
            "-" => Presence::Prohibited,
            "+" => Presence::Required,
            other => {
                return Err(Error::QueryParse {
                    message: format!("unrecognised presence operator {:?}", other),
                })
            }
        };

        match self.peek() {
            None => Err(Error::QueryParse {
                message: "expected a field or a term, found nothing".to_string(),
            }),
            Some(next) if next.kind == LexemeKind::Field => Ok(Some(State::Field)),
            Some(next) if next.kind == LexemeKind::Term => Ok(Some(State::Term)),
            Some(next) => Err(Error::QueryParse {
                message: format!("expected a field or a term, found {}", next.kind),
            }),
        }
    }

    fn parse_edit_distance(&mut self) -> Result<Option<State>> {
        let Some(lexeme) = self.consume() else {
            return Ok(None);
        };

        let edit_distance = lexeme.text.parse::<usize>().map_err(|_| Error::QueryParse {
            message: format!("edit distance must be numeric, found {:?}", lexeme.text),
        })?;
        self.current_clause.edit_distance = edit_distance;

        self.peek_next_lexeme()
    }

    fn parse_boost(&mut self) -> Result<Option<State>> {
        let Some(lexeme) = self.consume() else {
            return Ok(None);
        };

        let boost = lexeme.text.parse::<u64>().map_err(|_| Error::QueryParse {
            message: format!("boost must be numeric, found {:?}", lexeme.text),
        })?;
        self.current_clause.boost = boost as f64;

        self.peek_next_lexeme()
    }

    /// After a term, edit distance or boost: decide whether the clause is
    /// complete and what comes next.
    fn peek_next_lexeme(&mut self) -> Result<Option<State>> {
        let Some(next) = self.peek() else {
            self.next_clause();
            return Ok(None);
        };

        match next.kind {
            LexemeKind::Term => {
                self.next_clause();
                Ok(Some(State::Term))
            }
            LexemeKind::Field => {
                self.next_clause();
                Ok(Some(State::Field))
            }
            LexemeKind::Presence => {
                self.next_clause();
                Ok(Some(State::Presence))
            }
            LexemeKind::EditDistance => Ok(Some(State::EditDistance)),
            LexemeKind::Boost => Ok(Some(State::Boost)),
        }
    }
}
