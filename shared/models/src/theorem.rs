use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationErrors};

pub const DEFAULT_PROOF: &str = "Not provided";

/// Kind of mathematical result a theorem node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TheoremKind {
    #[default]
    Theorem,
    Lemma,
    Proposition,
    Corollary,
}

impl TheoremKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TheoremKind::Theorem => "Theorem",
            TheoremKind::Lemma => "Lemma",
            TheoremKind::Proposition => "Proposition",
            TheoremKind::Corollary => "Corollary",
        }
    }
}

impl fmt::Display for TheoremKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTheoremKind(pub String);

impl fmt::Display for UnknownTheoremKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown theorem type '{}' (expected Theorem, Lemma, Proposition or Corollary)",
            self.0
        )
    }
}

impl std::error::Error for UnknownTheoremKind {}

impl FromStr for TheoremKind {
    type Err = UnknownTheoremKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "theorem" => Ok(TheoremKind::Theorem),
            "lemma" => Ok(TheoremKind::Lemma),
            "proposition" => Ok(TheoremKind::Proposition),
            "corollary" => Ok(TheoremKind::Corollary),
            _ => Err(UnknownTheoremKind(s.to_string())),
        }
    }
}

impl TryFrom<String> for TheoremKind {
    type Error = UnknownTheoremKind;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TheoremKind> for String {
    fn from(kind: TheoremKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A theorem record as submitted for ingestion.
///
/// `dependencies` only drives `DEPENDS_ON` edge creation; it is not stored on
/// the node itself. `type` is the canonical field name for the kind, `t_type`
/// is accepted on input for older loader files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Theorem {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "statement must not be empty"))]
    pub statement: String,
    #[serde(default = "default_proof", deserialize_with = "proof_or_default")]
    pub proof: String,
    #[validate(length(min = 1, message = "subject must not be empty"))]
    pub subject: String,
    #[validate(length(min = 1, message = "domain must not be empty"))]
    pub domain: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(rename = "type", alias = "t_type", default)]
    pub kind: TheoremKind,
}

fn default_proof() -> String {
    DEFAULT_PROOF.to_string()
}

fn proof_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let proof: Option<String> = Option::deserialize(deserializer)?;
    Ok(proof.unwrap_or_else(default_proof))
}

impl Theorem {
    pub fn new(
        name: impl Into<String>,
        statement: impl Into<String>,
        subject: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            statement: statement.into(),
            proof: default_proof(),
            subject: subject.into(),
            domain: domain.into(),
            dependencies: Vec::new(),
            kind: TheoremKind::default(),
        }
    }

    pub fn with_kind(mut self, kind: TheoremKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Trim every text field and drop blank dependency names.
    ///
    /// Dependency order and repeats are kept as given.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.statement = self.statement.trim().to_string();
        self.subject = self.subject.trim().to_string();
        self.domain = self.domain.trim().to_string();
        self.proof = match self.proof.trim() {
            "" => default_proof(),
            proof => proof.to_string(),
        };
        self.dependencies = self
            .dependencies
            .into_iter()
            .map(|dep| dep.trim().to_string())
            .filter(|dep| !dep.is_empty())
            .collect();
        self
    }

    /// Normalize, then validate required fields.
    pub fn into_validated(self) -> Result<Self, ValidationErrors> {
        let theorem = self.normalized();
        theorem.validate()?;
        Ok(theorem)
    }
}

/// Fields of a theorem node as read back from the graph.
///
/// A stub node (created as a forward-referenced dependency) has only a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheoremRecord {
    pub name: String,
    pub statement: Option<String>,
    pub proof: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl TheoremRecord {
    pub fn stub(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            statement: None,
            proof: None,
            kind: None,
        }
    }

    pub fn is_stub(&self) -> bool {
        self.statement.is_none()
    }
}

impl From<&Theorem> for TheoremRecord {
    fn from(theorem: &Theorem) -> Self {
        Self {
            name: theorem.name.clone(),
            statement: Some(theorem.statement.clone()),
            proof: Some(theorem.proof.clone()),
            kind: Some(theorem.kind.to_string()),
        }
    }
}

/// A retrieved theorem together with its direct dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievedTheorem {
    #[serde(flatten)]
    pub theorem: TheoremRecord,
    pub dependencies: Vec<TheoremRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_applied() {
        let theorem: Theorem = serde_json::from_value(json!({
            "name": "Lagrange's Theorem",
            "statement": "The order of a subgroup divides the order of the group.",
            "subject": "Algebra",
            "domain": "Group Theory"
        }))
        .unwrap();

        assert_eq!(theorem.proof, DEFAULT_PROOF);
        assert_eq!(theorem.kind, TheoremKind::Theorem);
        assert!(theorem.dependencies.is_empty());
    }

    #[test]
    fn test_null_proof_becomes_default() {
        let theorem: Theorem = serde_json::from_value(json!({
            "name": "A",
            "statement": "s",
            "proof": null,
            "subject": "Algebra",
            "domain": "Linear Algebra"
        }))
        .unwrap();

        assert_eq!(theorem.proof, DEFAULT_PROOF);
    }

    #[test]
    fn test_legacy_t_type_alias() {
        let theorem: Theorem = serde_json::from_value(json!({
            "name": "Zorn's Lemma",
            "statement": "Every chain-bounded poset has a maximal element.",
            "subject": "Logic",
            "domain": "Set Theory",
            "t_type": "lemma"
        }))
        .unwrap();

        assert_eq!(theorem.kind, TheoremKind::Lemma);

        let out = serde_json::to_value(&theorem).unwrap();
        assert_eq!(out["type"], "Lemma");
        assert!(out.get("t_type").is_none());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let result: Result<Theorem, _> = serde_json::from_value(json!({
            "name": "A",
            "statement": "s",
            "subject": "Algebra",
            "domain": "Linear Algebra",
            "type": "conjecture"
        }));

        assert!(result.is_err());
    }

    #[test]
    fn test_normalized_trims_and_drops_blank_dependencies() {
        let theorem = Theorem::new("  Rank-Nullity ", "dim V = rank + nullity", " Algebra", "Linear Algebra ")
            .with_dependencies(["  Basis Extension ", "", "   ", "Basis Extension"])
            .normalized();

        assert_eq!(theorem.name, "Rank-Nullity");
        assert_eq!(theorem.subject, "Algebra");
        assert_eq!(theorem.domain, "Linear Algebra");
        assert_eq!(theorem.dependencies, vec!["Basis Extension", "Basis Extension"]);
    }

    #[test]
    fn test_validation_rejects_blank_required_fields() {
        let errors = Theorem::new("   ", "statement", "Algebra", "Linear Algebra")
            .into_validated()
            .unwrap_err();

        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_retrieved_theorem_serializes_flat() {
        let retrieved = RetrievedTheorem {
            theorem: TheoremRecord::from(&Theorem::new("A", "s", "Algebra", "Group Theory")),
            dependencies: vec![TheoremRecord::stub("B")],
        };

        let value = serde_json::to_value(&retrieved).unwrap();
        assert_eq!(value["name"], "A");
        assert_eq!(value["type"], "Theorem");
        assert_eq!(value["dependencies"][0]["name"], "B");
        assert!(value["dependencies"][0]["statement"].is_null());
    }
}
