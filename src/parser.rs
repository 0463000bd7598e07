//! This module provides the parser for tabular machine definitions, utilizing the `pest` crate.
//!
//! A definition is comma separated text. The first seven non-blank rows are headers:
//!
//! 1. machine name
//! 2. state names
//! 3. input alphabet
//! 4. tape alphabet
//! 5. start state
//! 6. accept state
//! 7. reject state
//!
//! Every following non-blank row is a transition `state,symbol,next_state,write,move` where
//! `move` is one of `L`, `R` or `S`. Rows sharing a `(state, symbol)` pair are alternatives.
//!
//! Fields may be double-quoted to hold commas, so `","` is the comma symbol. Inside quotes, `""`
//! stands for one `"`. Unquoted fields are trimmed, quoted ones are taken verbatim.

use crate::table::{TransitionRow, TransitionTable};
use crate::types::{Direction, Machine, NtmError, BLANK_SYMBOL};
use pest::{
    error::{Error, ErrorVariant},
    iterators::Pair,
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;
use std::borrow::Cow;

/// Derives a `PestParser` for the definition grammar in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct MachineParser;

const HEADERS: [&str; 7] = [
    "name",
    "states",
    "input alphabet",
    "tape alphabet",
    "start state",
    "accept state",
    "reject state",
];

const TRANSITION_FIELDS: usize = 5;

/// A row with trimmed, unquoted fields.
struct Record<'i> {
    fields: Vec<Cow<'i, str>>,
    span: Span<'i>,
}

/// Parses tabular definition text into a `Machine`.
///
/// Only the shape of the text is checked. Whether states are reachable or symbols belong to
/// the declared alphabets is left to the simulation, where it shows up as missing transitions.
///
/// # Returns
///
/// * `Ok(Machine)` if the text has all seven headers and every transition row is well formed.
/// * `Err(NtmError::ParseError)` if a row has the wrong shape.
/// * `Err(NtmError::DefinitionError)` if header rows are missing.
pub fn parse(input: &str) -> Result<Machine, NtmError> {
    let root = MachineParser::parse(Rule::table, input)
        .map_err(|e| NtmError::ParseError(Box::new(e)))?
        .next()
        .ok_or_else(|| NtmError::DefinitionError("Empty definition".to_string()))?;

    let mut records = root
        .into_inner()
        .filter(|pair| pair.as_rule() == Rule::record)
        .map(parse_record)
        .filter(|record| record.fields.iter().any(|field| !field.is_empty()));

    let mut headers = Vec::with_capacity(HEADERS.len());
    for header in HEADERS {
        let record = records
            .next()
            .ok_or_else(|| NtmError::DefinitionError(format!("Missing '{header}' header row")))?;
        headers.push(record);
    }

    let transitions = records
        .map(parse_transition)
        .collect::<Result<TransitionTable, _>>()?;

    Ok(Machine {
        name: parse_header_value(&headers[0], HEADERS[0])?,
        states: parse_header_list(&headers[1]),
        input_alphabet: parse_header_list(&headers[2]),
        tape_alphabet: parse_header_list(&headers[3]),
        start_state: parse_header_value(&headers[4], HEADERS[4])?,
        accept_state: parse_header_value(&headers[5], HEADERS[5])?,
        reject_state: parse_header_value(&headers[6], HEADERS[6])?,
        blank: BLANK_SYMBOL,
        transitions,
    })
}

fn parse_record(pair: Pair<'_, Rule>) -> Record<'_> {
    let span = pair.as_span();
    let fields = pair
        .into_inner()
        .filter(|field| field.as_rule() == Rule::field)
        .map(parse_field)
        .collect();

    Record { fields, span }
}

fn parse_field(pair: Pair<'_, Rule>) -> Cow<'_, str> {
    match pair.into_inner().next() {
        Some(inner) if inner.as_rule() == Rule::quoted => {
            let text = inner.as_str();
            let body = &text[1..text.len() - 1];
            if body.contains("\"\"") {
                Cow::Owned(body.replace("\"\"", "\""))
            } else {
                Cow::Borrowed(body)
            }
        }
        Some(inner) => Cow::Borrowed(inner.as_str().trim()),
        None => Cow::Borrowed(""),
    }
}

/// The first field of a header row. Remaining fields are ignored.
fn parse_header_value(record: &Record, header: &str) -> Result<String, NtmError> {
    match record.fields.first() {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(parse_error(&format!("Empty '{header}' header"), record.span)),
    }
}

fn parse_header_list(record: &Record) -> Vec<String> {
    record
        .fields
        .iter()
        .filter(|field| !field.is_empty())
        .map(|field| field.to_string())
        .collect()
}

fn parse_transition(record: Record) -> Result<TransitionRow, NtmError> {
    let span = record.span;
    let [state, symbol, next_state, write, direction] = record.fields.as_slice() else {
        return Err(parse_error(
            &format!(
                "Expected {TRANSITION_FIELDS} fields (state, symbol, next state, write, move), found {}",
                record.fields.len()
            ),
            span,
        ));
    };

    Ok(TransitionRow {
        state: state.to_string(),
        symbol: parse_symbol(symbol, span)?,
        next_state: next_state.to_string(),
        write: parse_symbol(write, span)?,
        direction: parse_direction(direction, span)?,
    })
}

/// Parses a single tape symbol. Symbols are exactly one character.
fn parse_symbol(field: &str, span: Span) -> Result<char, NtmError> {
    let mut chars = field.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(parse_error(
            &format!("Symbol must be a single character, found '{field}'"),
            span,
        )),
    }
}

/// Parses a move direction.
///
/// Supports 'L' or '<' for Left, 'R' or '>' for Right, and 'S' or '-' for Stay.
fn parse_direction(field: &str, span: Span) -> Result<Direction, NtmError> {
    match field {
        "L" | "<" => Ok(Direction::Left),
        "R" | ">" => Ok(Direction::Right),
        "S" | "-" => Ok(Direction::Stay),
        _ => Err(parse_error(
            &format!("Unsupported direction: {field}"),
            span,
        )),
    }
}

/// Creates an `NtmError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> NtmError {
    NtmError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}
