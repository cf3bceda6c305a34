//! schema fetching and merging
//!
//! [`Merger`] posts the standard introspection query to each endpoint
//! in input order, skips endpoints that fail, merges the surviving raw
//! type lists, and rebuilds one composed [`Schema`]. later endpoints
//! win merge conflicts except on the query/mutation roots, whose field
//! maps union with the first-seen field retained.

use crate::config::FetchConfig;
use crate::error::{Error, Result};
use crate::introspection::{
    IntrospectionDirective, IntrospectionResponse, IntrospectionSchema, IntrospectionType,
    RootTypeRef, INTROSPECTION_OPERATION_NAME, INTROSPECTION_QUERY,
};
use crate::schema::Schema;
use reqwest::StatusCode;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use url::Url;

/// one endpoint's raw introspection payload plus its derived schema
#[derive(Debug, Clone)]
pub struct EndpointSchema {
    /// endpoint url the payload came from
    pub url: String,
    /// raw `__schema` payload
    pub raw: IntrospectionSchema,
    /// schema parsed from the raw payload alone
    pub schema: Schema,
}

impl EndpointSchema {
    /// parse one introspection response body into an endpoint schema
    pub fn from_response(endpoint: &str, body: &str) -> Result<Self> {
        let parsed: IntrospectionResponse =
            serde_json::from_str(body).map_err(|err| Error::Introspection {
                url: endpoint.to_string(),
                reason: format!("unparseable response: {err}"),
            })?;

        let raw = parsed
            .data
            .and_then(|data| data.schema)
            .ok_or_else(|| Error::Introspection {
                url: endpoint.to_string(),
                reason: "response carries no data.__schema".to_string(),
            })?;

        let schema = Schema::build(raw.clone()).map_err(|err| Error::Introspection {
            url: endpoint.to_string(),
            reason: err.to_string(),
        })?;

        Ok(Self {
            url: endpoint.to_string(),
            raw,
            schema,
        })
    }
}

/// result of a full merge cycle
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// per-endpoint schemas, keyed by url; failed endpoints are absent
    pub schemas: BTreeMap<String, EndpointSchema>,
    /// the composed schema over every fetched endpoint
    pub composed: Schema,
}

/// fetches and merges schemas from graphql endpoints
#[derive(Clone)]
pub struct Merger {
    config: FetchConfig,
    http: reqwest::Client,
}

impl Merger {
    /// create a new merger
    pub fn new(config: FetchConfig) -> Result<Self> {
        let http = match &config.http_client {
            Some(client) => client.clone(),
            None => reqwest::Client::builder()
                .default_headers(config.extra_headers.clone())
                .user_agent(config.user_agent.clone())
                .timeout(config.timeout)
                .danger_accept_invalid_certs(!config.verify_ssl)
                .build()?,
        };

        Ok(Self { config, http })
    }

    /// access the merger configuration
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// fetch one endpoint's schema via introspection
    pub async fn fetch_one(&self, endpoint: &str) -> Result<EndpointSchema> {
        self.fetch_one_with(endpoint, |url, body| async move {
            let response = self.http.post(url).json(&body).send().await?;
            let status = response.status();
            let text = response.text().await?;
            Ok((status, text))
        })
        .await
    }

    /// fetch every endpoint in order and merge into one composed schema.
    ///
    /// endpoints that fail to fetch or parse are skipped; a structural
    /// failure while rebuilding the merged schema aborts the whole call.
    pub async fn merge_all(&self, endpoints: &[String]) -> Result<MergeOutcome> {
        self.merge_all_with(endpoints, |url, body| async move {
            let response = self.http.post(url).json(&body).send().await?;
            let status = response.status();
            let text = response.text().await?;
            Ok((status, text))
        })
        .await
    }
}

fn introspection_body() -> serde_json::Value {
    serde_json::json!({
        "operationName": INTROSPECTION_OPERATION_NAME,
        "query": INTROSPECTION_QUERY,
    })
}

fn endpoint_url(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint)?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::Config(format!(
            "invalid url scheme: {}. must be http or https",
            url.scheme()
        )));
    }
    Ok(url)
}

impl Merger {
    pub(crate) async fn fetch_one_with<F, Fut>(
        &self,
        endpoint: &str,
        send: F,
    ) -> Result<EndpointSchema>
    where
        F: FnOnce(Url, serde_json::Value) -> Fut,
        Fut: Future<Output = Result<(StatusCode, String)>>,
    {
        let url = endpoint_url(endpoint)?;

        let (status, text) = send(url, introspection_body())
            .await
            .map_err(|err| match err {
                err @ Error::Introspection { .. } => err,
                other => Error::Introspection {
                    url: endpoint.to_string(),
                    reason: other.to_string(),
                },
            })?;

        if !status.is_success() {
            return Err(Error::Introspection {
                url: endpoint.to_string(),
                reason: format!("http status {status}"),
            });
        }

        EndpointSchema::from_response(endpoint, &text)
    }

    pub(crate) async fn merge_all_with<F, Fut>(
        &self,
        endpoints: &[String],
        send: F,
    ) -> Result<MergeOutcome>
    where
        F: Fn(Url, serde_json::Value) -> Fut,
        Fut: Future<Output = Result<(StatusCode, String)>>,
    {
        let mut fetched = Vec::new();

        // one at a time, in input order: later endpoints must win
        // conflicts, so completion order has to match input order
        for endpoint in endpoints {
            match self.fetch_one_with(endpoint, &send).await {
                Ok(endpoint_schema) => fetched.push(endpoint_schema),
                Err(err) => {
                    tracing::warn!(endpoint = %endpoint, error = %err, "skipping endpoint");
                }
            }
        }

        compose(fetched)
    }
}

/// merge already-fetched endpoint schemas, in list order, into one
/// composed schema
pub fn compose(fetched: Vec<EndpointSchema>) -> Result<MergeOutcome> {
    let mut schemas = BTreeMap::new();
    let mut description: Option<String> = None;
    let mut query_type: Option<RootTypeRef> = None;
    let mut mutation_type: Option<RootTypeRef> = None;
    let mut subscription_type: Option<RootTypeRef> = None;
    let mut all_types: Vec<IntrospectionType> = Vec::new();
    let mut directives: Vec<IntrospectionDirective> = Vec::new();

    for endpoint_schema in fetched {
        description = endpoint_schema.raw.description.clone();
        if let Some(root) = &endpoint_schema.raw.query_type {
            query_type = Some(root.clone());
        }
        if let Some(root) = &endpoint_schema.raw.mutation_type {
            mutation_type = Some(root.clone());
        }
        if let Some(root) = &endpoint_schema.raw.subscription_type {
            subscription_type = Some(root.clone());
        }
        all_types.extend(endpoint_schema.raw.types.iter().cloned());
        directives.extend(endpoint_schema.raw.directives.iter().cloned());

        schemas.insert(endpoint_schema.url.clone(), endpoint_schema);
    }

    let query_root = query_type.as_ref().map(|root| root.name.clone());
    let mutation_root = mutation_type.as_ref().map(|root| root.name.clone());
    let types = merge_types(all_types, query_root.as_deref(), mutation_root.as_deref());

    let composed = Schema::build(IntrospectionSchema {
        description,
        query_type,
        mutation_type,
        subscription_type,
        types,
        directives,
    })?;

    Ok(MergeOutcome { schemas, composed })
}

/// deduplicate a concatenated type list, in fetch order.
///
/// a colliding query/mutation root unions field maps: the first-seen
/// field of a given name is retained, the type's own metadata comes
/// from the later occurrence. any other colliding name is fully
/// replaced by the later occurrence, keeping its original position.
fn merge_types(
    all: Vec<IntrospectionType>,
    query_root: Option<&str>,
    mutation_root: Option<&str>,
) -> Vec<IntrospectionType> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<IntrospectionType> = Vec::new();

    for ty in all {
        let Some(name) = ty.name.clone() else {
            // unnamed entries fail the structural rebuild later
            out.push(ty);
            continue;
        };

        let Some(&existing) = index.get(&name) else {
            index.insert(name, out.len());
            out.push(ty);
            continue;
        };

        let is_root = Some(name.as_str()) == query_root || Some(name.as_str()) == mutation_root;
        if !is_root {
            out[existing] = ty;
            continue;
        }

        let mut fields = out[existing].fields.take().unwrap_or_default();
        let mut merged = ty;
        for field in merged.fields.take().unwrap_or_default() {
            if !fields.iter().any(|f| f.name == field.name) {
                fields.push(field);
            }
        }
        merged.fields = Some(fields);
        out[existing] = merged;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspection::TypeKind;

    fn test_merger() -> Merger {
        let http = reqwest::Client::builder()
            .no_proxy()
            .build()
            .expect("test http client");
        Merger::new(FetchConfig::new().with_http_client(http)).expect("merger")
    }

    fn schema_body(body: serde_json::Value) -> String {
        serde_json::json!({ "data": { "__schema": body } }).to_string()
    }

    fn one_field_endpoint(field: &str, scalar: &str) -> serde_json::Value {
        serde_json::json!({
            "queryType": { "name": "Query" },
            "types": [
                { "kind": "SCALAR", "name": scalar },
                {
                    "kind": "OBJECT",
                    "name": "Query",
                    "fields": [
                        {
                            "name": field,
                            "args": [],
                            "type": { "kind": "SCALAR", "name": scalar }
                        }
                    ]
                }
            ],
            "directives": []
        })
    }

    #[cfg_attr(miri, ignore)]
    #[tokio::test]
    async fn test_fetch_one_posts_the_introspection_query() {
        let merger = test_merger();
        let fetched = merger
            .fetch_one_with("http://one.example/graphql", |url, body| async move {
                assert_eq!(url.host_str(), Some("one.example"));
                assert_eq!(body["operationName"], "IntrospectionQuery");
                Ok((StatusCode::OK, schema_body(one_field_endpoint("hello", "String"))))
            })
            .await
            .unwrap();

        assert!(fetched.schema.query_field("hello").is_some());
        assert_eq!(fetched.url, "http://one.example/graphql");
    }

    #[cfg_attr(miri, ignore)]
    #[tokio::test]
    async fn test_fetch_one_rejects_non_schema_payload() {
        let merger = test_merger();
        let err = merger
            .fetch_one_with("http://one.example/graphql", |_url, _body| async move {
                Ok((StatusCode::OK, "{\"data\": {}}".to_string()))
            })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Introspection { .. }));
    }

    #[cfg_attr(miri, ignore)]
    #[tokio::test]
    async fn test_merge_unions_disjoint_query_fields() {
        let merger = test_merger();
        let endpoints = vec![
            "http://one.example/graphql".to_string(),
            "http://two.example/graphql".to_string(),
        ];
        let outcome = merger
            .merge_all_with(&endpoints, |url, _body| async move {
                let body = if url.host_str() == Some("one.example") {
                    one_field_endpoint("alpha", "String")
                } else {
                    one_field_endpoint("beta", "String")
                };
                Ok((StatusCode::OK, schema_body(body)))
            })
            .await
            .unwrap();

        assert!(outcome.composed.query_field("alpha").is_some());
        assert!(outcome.composed.query_field("beta").is_some());
        assert_eq!(outcome.schemas.len(), 2);
    }

    #[cfg_attr(miri, ignore)]
    #[tokio::test]
    async fn test_merge_keeps_first_seen_root_field() {
        let merger = test_merger();
        let endpoints = vec![
            "http://one.example/graphql".to_string(),
            "http://two.example/graphql".to_string(),
        ];
        let outcome = merger
            .merge_all_with(&endpoints, |url, _body| async move {
                let body = if url.host_str() == Some("one.example") {
                    one_field_endpoint("thing", "String")
                } else {
                    one_field_endpoint("thing", "Int")
                };
                Ok((StatusCode::OK, schema_body(body)))
            })
            .await
            .unwrap();

        let field = outcome.composed.query_field("thing").unwrap();
        assert_eq!(field.ty.name.as_deref(), Some("String"));
    }

    #[cfg_attr(miri, ignore)]
    #[tokio::test]
    async fn test_merge_replaces_non_root_types_with_later_source() {
        let merger = test_merger();
        let endpoints = vec![
            "http://one.example/graphql".to_string(),
            "http://two.example/graphql".to_string(),
        ];
        let outcome = merger
            .merge_all_with(&endpoints, |url, _body| async move {
                let foo_field = if url.host_str() == Some("one.example") {
                    "fromA"
                } else {
                    "fromB"
                };
                let body = serde_json::json!({
                    "queryType": { "name": "Query" },
                    "types": [
                        { "kind": "SCALAR", "name": "String" },
                        {
                            "kind": "OBJECT",
                            "name": "Query",
                            "fields": [
                                {
                                    "name": "foo",
                                    "args": [],
                                    "type": { "kind": "OBJECT", "name": "Foo" }
                                }
                            ]
                        },
                        {
                            "kind": "OBJECT",
                            "name": "Foo",
                            "fields": [
                                {
                                    "name": foo_field,
                                    "args": [],
                                    "type": { "kind": "SCALAR", "name": "String" }
                                }
                            ]
                        }
                    ],
                    "directives": []
                });
                Ok((StatusCode::OK, schema_body(body)))
            })
            .await
            .unwrap();

        let foo = outcome.composed.get_type("Foo").unwrap();
        assert!(foo.field("fromB").is_some());
        assert!(foo.field("fromA").is_none());
    }

    #[cfg_attr(miri, ignore)]
    #[tokio::test]
    async fn test_merge_survives_a_failing_endpoint() {
        let merger = test_merger();
        let endpoints = vec![
            "http://down.example/graphql".to_string(),
            "http://up.example/graphql".to_string(),
        ];
        let outcome = merger
            .merge_all_with(&endpoints, |url, _body| async move {
                if url.host_str() == Some("down.example") {
                    Ok((StatusCode::GATEWAY_TIMEOUT, String::new()))
                } else {
                    Ok((StatusCode::OK, schema_body(one_field_endpoint("hello", "String"))))
                }
            })
            .await
            .unwrap();

        assert_eq!(outcome.schemas.len(), 1);
        assert!(outcome.schemas.contains_key("http://up.example/graphql"));
        assert!(outcome.composed.query_field("hello").is_some());
    }

    #[cfg_attr(miri, ignore)]
    #[tokio::test]
    async fn test_merge_fails_when_nothing_was_fetched() {
        let merger = test_merger();
        let endpoints = vec!["http://down.example/graphql".to_string()];
        let err = merger
            .merge_all_with(&endpoints, |_url, _body| async move {
                Ok((StatusCode::INTERNAL_SERVER_ERROR, String::new()))
            })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Merge(_)));
    }

    #[cfg_attr(miri, ignore)]
    #[tokio::test]
    async fn test_subscription_root_included_only_when_declared() {
        let merger = test_merger();
        let endpoints = vec!["http://one.example/graphql".to_string()];
        let outcome = merger
            .merge_all_with(&endpoints, |_url, _body| async move {
                Ok((StatusCode::OK, schema_body(one_field_endpoint("hello", "String"))))
            })
            .await
            .unwrap();
        assert!(outcome.composed.subscription_type_name().is_none());

        let outcome = merger
            .merge_all_with(&endpoints, |_url, _body| async move {
                let body = serde_json::json!({
                    "queryType": { "name": "Query" },
                    "subscriptionType": { "name": "Subscription" },
                    "types": [
                        { "kind": "SCALAR", "name": "String" },
                        {
                            "kind": "OBJECT",
                            "name": "Query",
                            "fields": [
                                {
                                    "name": "hello",
                                    "args": [],
                                    "type": { "kind": "SCALAR", "name": "String" }
                                }
                            ]
                        },
                        {
                            "kind": "OBJECT",
                            "name": "Subscription",
                            "fields": [
                                {
                                    "name": "onHello",
                                    "args": [],
                                    "type": { "kind": "SCALAR", "name": "String" }
                                }
                            ]
                        }
                    ],
                    "directives": []
                });
                Ok((StatusCode::OK, schema_body(body)))
            })
            .await
            .unwrap();
        assert_eq!(outcome.composed.subscription_type_name(), Some("Subscription"));
        assert_eq!(
            outcome
                .composed
                .subscription_fields()
                .map(|fields| fields.len()),
            Some(1)
        );
    }

    #[test]
    fn test_endpoint_url_rejects_non_http_schemes() {
        let err = endpoint_url("ftp://example.com").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_merge_types_root_union_retains_first_field_order() {
        let one = one_field_endpoint("alpha", "String");
        let two = one_field_endpoint("beta", "String");
        let parse = |value: serde_json::Value| -> Vec<IntrospectionType> {
            serde_json::from_value(value["types"].clone()).unwrap()
        };
        let mut all = parse(one);
        all.extend(parse(two));

        let merged = merge_types(all, Some("Query"), None);
        let query = merged
            .iter()
            .find(|t| t.name.as_deref() == Some("Query"))
            .unwrap();
        assert_eq!(query.kind, TypeKind::Object);
        let names: Vec<&str> = query
            .fields
            .as_ref()
            .unwrap()
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["alpha", "beta"]);
    }
}
