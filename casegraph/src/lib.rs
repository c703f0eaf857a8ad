//! Wraps the graph machinery a CASE/UCO document needs: parse JSON-LD, expand
//! it to RDF quads, populate an in-memory triple store, and answer SPARQL
//! SELECT queries. Callers only ever see [`Row`]s -- plain maps from binding
//! name to the term's string value -- so everything downstream of this crate
//! can be tested with hand-written rows.

#[macro_use]
extern crate log;

use std::collections::BTreeMap;

use anyhow::{anyhow, bail, Result};
use json_ld::{
    rdf_types::{Quad, Term},
    syntax::{Parse, Value},
    JsonLdProcessor, RemoteDocument,
};
use oxigraph::model::{BlankNode, GraphName, Literal, NamedNode, Quad as StoreQuad, Subject};
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use static_iref::iri;

/// One SPARQL solution: binding name -> the bound term's string value.
/// Bindings left unbound by the query don't appear at all.
pub type Row = BTreeMap<String, String>;

/// An in-memory RDF view of one CASE JSON-LD document.
pub struct CaseGraph {
    store: Store,
}

impl CaseGraph {
    /// Reads and loads a CASE JSON-LD file.
    pub async fn load(path: &str) -> Result<CaseGraph> {
        let contents = fs_err::read_to_string(path)?;
        CaseGraph::from_json_ld(&contents).await
    }

    /// Parses a JSON-LD document, expands it to RDF, and fills a store with
    /// the resulting quads. All quads land in the default graph.
    pub async fn from_json_ld(contents: &str) -> Result<CaseGraph> {
        let value = Value::parse_str(contents)
            .map_err(|err| anyhow!("parsing JSON-LD failed: {err}"))?
            .0;

        // The document was already read from disk; a fixed base IRI and
        // NoLoader keep expansion from touching the network.
        let input = RemoteDocument::new(
            Some(iri!("https://example.com/graph.jsonld").to_owned()),
            "application/ld+json".parse().ok(),
            value,
        );
        let loader = json_ld::NoLoader;
        let mut generator = json_ld::rdf_types::generator::Blank::new();
        let mut rdf = input
            .to_rdf(&mut generator, &loader)
            .await
            .map_err(|err| anyhow!("converting JSON-LD to RDF failed: {err:?}"))?;

        let store = Store::new()?;
        let mut count = 0;
        for quad in rdf.quads() {
            let Quad(s, p, o, _g) = quad;

            let subject: Subject = if let Some(iri) = s.as_iri() {
                NamedNode::new(iri.as_str())?.into()
            } else if let Some(blank) = s.as_blank() {
                blank_node(blank.as_str())?.into()
            } else {
                bail!("unsupported RDF subject in expanded document");
            };
            let predicate = match p.as_iri() {
                Some(iri) => NamedNode::new(iri.as_str())?,
                None => bail!("RDF predicate isn't an IRI"),
            };
            let object: oxigraph::model::Term = match o.to_owned() {
                Term::Id(id) => {
                    if let Some(iri) = id.as_iri() {
                        NamedNode::new(iri.as_str())?.into()
                    } else if let Some(blank) = id.as_blank() {
                        blank_node(blank.as_str())?.into()
                    } else {
                        bail!("unsupported RDF object in expanded document");
                    }
                }
                // Only the lexical form matters here; the consumers of this
                // crate treat every value as a string.
                Term::Literal(lit) => Literal::new_simple_literal(&lit.value).into(),
            };

            store.insert(&StoreQuad::new(
                subject,
                predicate,
                object,
                GraphName::DefaultGraph,
            ))?;
            count += 1;
        }
        info!("Loaded {} RDF quads", count);

        Ok(CaseGraph { store })
    }

    /// Runs a SELECT query and returns one `Row` per solution, in the order
    /// the store produced them. Literal terms contribute their lexical value;
    /// IRIs and blank nodes contribute their serialized form.
    pub fn query(&self, sparql: &str) -> Result<Vec<Row>> {
        let mut rows = Vec::new();
        if let QueryResults::Solutions(solutions) = self.store.query(sparql)? {
            for solution in solutions {
                let solution = solution?;
                let mut row = Row::new();
                for (variable, term) in solution.iter() {
                    let value = match term {
                        oxigraph::model::Term::Literal(lit) => lit.value().to_string(),
                        other => other.to_string(),
                    };
                    row.insert(variable.as_str().to_string(), value);
                }
                rows.push(row);
            }
        }
        Ok(rows)
    }
}

/// Blank node labels arrive as "_:b0"; the store wants just the "b0" part.
fn blank_node(label: &str) -> Result<BlankNode> {
    let suffix = label.strip_prefix("_:").unwrap_or(label);
    Ok(BlankNode::new(suffix)?)
}
