//! Cypher used by the Neo4j store.

pub const CONSTRAINTS: [&str; 3] = [
    "CREATE CONSTRAINT theorem_name IF NOT EXISTS FOR (t:Theorem) REQUIRE t.name IS UNIQUE",
    "CREATE CONSTRAINT subject_name IF NOT EXISTS FOR (s:Subject) REQUIRE s.name IS UNIQUE",
    "CREATE CONSTRAINT domain_name IF NOT EXISTS FOR (d:Domain) REQUIRE d.name IS UNIQUE",
];

/// `ON CREATE SET` must directly follow the `MERGE` it belongs to.
pub const UPSERT_THEOREM: &str = r#"
MERGE (t:Theorem {name: $name})
ON CREATE SET t.created_at = datetime()
SET t.statement = $statement,
    t.proof = $proof,
    t.type = $type,
    t.updated_at = datetime()

MERGE (s:Subject {name: $subject})
MERGE (t)-[:BELONGS_TO_SUBJECT]->(s)

MERGE (d:Domain {name: $domain})
MERGE (t)-[:BELONGS_TO_DOMAIN]->(d)
MERGE (d)-[:PART_OF_SUBJECT]->(s)
"#;

pub const LINK_DEPENDENCY: &str = r#"
MATCH (t:Theorem {name: $theorem_name})
MERGE (d:Theorem {name: $dep_name})
ON CREATE SET d.created_at = datetime()
MERGE (t)-[:DEPENDS_ON]->(d)
"#;

pub const GET_THEOREM: &str = r#"
MATCH (t:Theorem {name: $name})
RETURN t.name AS name,
       t.statement AS statement,
       t.proof AS proof,
       t.type AS type
"#;

pub const GET_DEPENDENCIES: &str = r#"
MATCH (t:Theorem {name: $name})-[:DEPENDS_ON]->(dep:Theorem)
RETURN dep.name AS dependency
ORDER BY dep.name
"#;

pub const STATISTICS: &str = r#"
CALL { MATCH (t:Theorem) RETURN count(t) AS theorems }
CALL { MATCH (s:Subject) RETURN count(s) AS subjects }
CALL { MATCH (d:Domain) RETURN count(d) AS domains }
CALL { MATCH (:Theorem)-[r:DEPENDS_ON]->(:Theorem) RETURN count(r) AS dependencies }
RETURN theorems, subjects, domains, dependencies
"#;
