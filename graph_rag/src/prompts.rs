//! Prompt templates for question parsing and answer generation.
//!
//! Placeholders are `{chat_history}`, `{question}` and `{theorems}`. Filling is
//! a single pass over the template, so user text that happens to contain a
//! placeholder is never expanded.

use theograph_models::{RetrievedTheorem, TheoremRecord};

use crate::llm::{Prompt, PromptKind};

pub const SYSTEM_PROMPT: &str = "You are a careful mathematics assistant. \
You answer questions about theorems, lemmas, propositions and corollaries, \
and you never invent results that were not given to you as context.";

pub const PARSE_QUESTION_TEMPLATE: &str = r#"Task: decide which named mathematical results are needed to answer the question.

Respond with a single JSON object and nothing else:
{"theorems": ["<exact name>", "<exact name>"]}

Rules:
- List only results that the question names or clearly refers to, using their usual names.
- If the question does not concern a specific theorem, lemma, proposition or corollary, respond with {"theorems": []}.
- Do not add explanations.

Conversation so far:
{chat_history}

Question:
{question}"#;

pub const ANSWER_WITHOUT_RAG_TEMPLATE: &str = r#"Answer the user's question. If it is about mathematics, be precise and state any assumptions.

Conversation so far:
{chat_history}

Question:
{question}

Answer:"#;

pub const ANSWER_WITH_RAG_TEMPLATE: &str = r#"Answer the user's question using the theorems below. Each theorem is listed with its statement, its proof when one is recorded, and the results it depends on.
Cite theorems by name. If the listed theorems are not enough to answer, say so instead of guessing.

Theorems:
{theorems}

Conversation so far:
{chat_history}

Question:
{question}

Answer:"#;

const EMPTY_HISTORY: &str = "(no previous messages)";
const NO_THEOREMS: &str = "No matching theorems were found in the knowledge graph.";

pub fn parse_question(chat_history: &str, question: &str) -> Prompt {
    Prompt {
        kind: PromptKind::ParseQuestion,
        system: SYSTEM_PROMPT.to_string(),
        text: fill(
            PARSE_QUESTION_TEMPLATE,
            &[("chat_history", history_or_placeholder(chat_history)), ("question", question)],
        ),
        expects_json: true,
    }
}

pub fn answer_without_rag(chat_history: &str, question: &str) -> Prompt {
    Prompt {
        kind: PromptKind::AnswerWithoutRag,
        system: SYSTEM_PROMPT.to_string(),
        text: fill(
            ANSWER_WITHOUT_RAG_TEMPLATE,
            &[("chat_history", history_or_placeholder(chat_history)), ("question", question)],
        ),
        expects_json: false,
    }
}

pub fn answer_with_rag(chat_history: &str, question: &str, theorems: &str) -> Prompt {
    Prompt {
        kind: PromptKind::AnswerWithRag,
        system: SYSTEM_PROMPT.to_string(),
        text: fill(
            ANSWER_WITH_RAG_TEMPLATE,
            &[
                ("chat_history", history_or_placeholder(chat_history)),
                ("question", question),
                ("theorems", theorems),
            ],
        ),
        expects_json: false,
    }
}

fn history_or_placeholder(chat_history: &str) -> &str {
    if chat_history.trim().is_empty() {
        EMPTY_HISTORY
    } else {
        chat_history
    }
}

/// Substitute `{key}` placeholders in one left-to-right pass.
///
/// Unknown `{...}` groups (such as the JSON example in the parse template)
/// are copied through untouched.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        let Some(close) = after_open.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };

        let key = &after_open[..close];
        match vars.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push('{');
                out.push_str(key);
                out.push('}');
            }
        }
        rest = &after_open[close + 1..];
    }

    out.push_str(rest);
    out
}

/// Theorem text for the answer prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct TheoremContext {
    pub text: String,
    /// Number of leading theorems that appear in `text`, whole or shortened
    pub included: usize,
}

const SEPARATOR: &str = "\n\n";
const TRUNCATED_SUFFIX: &str = "… [truncated]";

/// Format retrieved theorems for the answer prompt. The result, omission
/// marker included, is at most `max_chars` characters.
///
/// Theorems are taken in order while they fit whole. When not even the first
/// one fits, it is shortened: its proof is cut first, then its dependency
/// list is collapsed to a count.
pub fn render_theorems(theorems: &[RetrievedTheorem], max_chars: usize) -> TheoremContext {
    if theorems.is_empty() {
        return TheoremContext {
            text: NO_THEOREMS.to_string(),
            included: 0,
        };
    }

    let blocks: Vec<String> = theorems.iter().map(render_block).collect();
    let total = blocks.len();

    let mut used = 0;
    let mut included = 0;
    for (index, block) in blocks.iter().enumerate() {
        let separator = if index == 0 { 0 } else { char_len(SEPARATOR) };
        let next = used + separator + char_len(block);
        if next + marker_room(total - index - 1) > max_chars {
            break;
        }
        used = next;
        included += 1;
    }

    let mut text = blocks[..included].join(SEPARATOR);
    if included == 0 {
        let budget = max_chars.saturating_sub(marker_room(total - 1));
        text = fit_block(&theorems[0], budget);
        if !text.is_empty() {
            included = 1;
        }
    }

    if included < total {
        if !text.is_empty() {
            text.push_str(SEPARATOR);
        }
        text.push_str(&omitted_marker(total - included));
    }

    TheoremContext {
        text: cut(&text, max_chars),
        included,
    }
}

fn omitted_marker(omitted: usize) -> String {
    format!("[{} more theorem(s) omitted to fit the context window]", omitted)
}

fn marker_room(omitted: usize) -> usize {
    if omitted == 0 {
        0
    } else {
        char_len(SEPARATOR) + char_len(&omitted_marker(omitted))
    }
}

/// Shorten one block to at most `budget` characters.
fn fit_block(retrieved: &RetrievedTheorem, budget: usize) -> String {
    for list_dependencies in [true, false] {
        if let Some(block) = fit_with_proof(retrieved, list_dependencies, budget) {
            return block;
        }
    }
    cut(&compose_block(retrieved, None, false), budget)
}

fn fit_with_proof(
    retrieved: &RetrievedTheorem,
    list_dependencies: bool,
    budget: usize,
) -> Option<String> {
    let proof = retrieved.theorem.proof.as_deref();
    let whole = compose_block(retrieved, proof, list_dependencies);
    if char_len(&whole) <= budget {
        return Some(whole);
    }

    let proof = proof?;
    let overhead = char_len(&compose_block(retrieved, Some(""), list_dependencies))
        + char_len(TRUNCATED_SUFFIX);
    let keep = budget.checked_sub(overhead)?;
    let shortened = format!("{}{}", prefix_chars(proof, keep), TRUNCATED_SUFFIX);
    Some(compose_block(retrieved, Some(&shortened), list_dependencies))
}

fn render_block(retrieved: &RetrievedTheorem) -> String {
    compose_block(retrieved, retrieved.theorem.proof.as_deref(), true)
}

fn compose_block(
    retrieved: &RetrievedTheorem,
    proof: Option<&str>,
    list_dependencies: bool,
) -> String {
    let theorem = &retrieved.theorem;
    let mut block = format!("{} ({})\n", theorem.name, kind_label(theorem));

    match &theorem.statement {
        Some(statement) => block.push_str(&format!("Statement: {}\n", statement)),
        None => block.push_str("Statement: not yet recorded\n"),
    }
    if let Some(proof) = proof {
        block.push_str(&format!("Proof: {}\n", proof));
    }

    if retrieved.dependencies.is_empty() {
        block.push_str("Depends on: nothing recorded");
    } else if !list_dependencies {
        block.push_str(&format!(
            "Depends on: {} result(s), not shown",
            retrieved.dependencies.len()
        ));
    } else {
        block.push_str("Depends on:");
        for dep in &retrieved.dependencies {
            match &dep.statement {
                Some(statement) => block.push_str(&format!(
                    "\n  - {} ({}): {}",
                    dep.name,
                    kind_label(dep),
                    statement
                )),
                None => block.push_str(&format!("\n  - {} (statement not yet recorded)", dep.name)),
            }
        }
    }

    block
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// The first `n` characters of `text`.
fn prefix_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Hard cap at `max_chars` characters, ending in `…` when anything was cut.
fn cut(text: &str, max_chars: usize) -> String {
    if char_len(text) <= max_chars {
        text.to_string()
    } else if max_chars == 0 {
        String::new()
    } else {
        format!("{}…", prefix_chars(text, max_chars - 1))
    }
}

fn kind_label(record: &TheoremRecord) -> &str {
    record.kind.as_deref().unwrap_or("Theorem")
}
