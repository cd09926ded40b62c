//! HTTP dispatcher for the live API.

use log::info;
use reqwest::blocking::{Client as ReqwestClient, ClientBuilder, Response};
use reqwest::header::ACCEPT;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::dispatch::{Dispatch, Params};
use crate::error::Error;
use crate::models::{self, CommentData, ListingData, Replies, Thing};
use crate::options::{CommentOptions, CommentSort};

/// User agent sent with every request.
const USER_AGENT: &str = concat!("orangered/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
struct HttpClient {
    base_url: Url,
    reqwest: ReqwestClient,
}

/// [`Dispatch`] implementation over HTTP.
///
/// Stateless apart from the connection pool; a single client can back
/// any number of posts and comments.
pub struct Client {
    http: HttpClient,
}

impl Client {
    /// Create a new client for the API at `base_url`.
    pub fn new(base_url: Url) -> Result<Self, Error> {
        let reqwest = ClientBuilder::new().user_agent(USER_AGENT).build()?;
        Ok(Client {
            http: HttpClient { base_url, reqwest },
        })
    }
}

impl Dispatch for Client {
    fn comments(
        &self,
        link_id: &str,
        subreddit: Option<&str>,
        options: &CommentOptions,
    ) -> Result<Replies, Error> {
        let path = match subreddit {
            Some(subreddit) => format!("r/{}/comments/{}.json", subreddit, link_id),
            None => format!("comments/{}.json", link_id),
        };

        let things: Vec<Thing> = self.http.get_json(&path, &comment_query(options))?.json()?;

        // The response carries two listings: the link itself, then its
        // comment tree.
        let listing = things
            .into_iter()
            .nth(1)
            .ok_or(Error::UnexpectedResponse("comment listing missing"))?;
        let listing: ListingData = serde_json::from_value(listing.data)?;
        Ok(Replies::from_listing(listing)?)
    }

    fn submit(
        &self,
        operation: &'static str,
        fullname: &str,
        mut params: Params,
    ) -> Result<Option<Value>, Error> {
        params.push((id_param(operation), fullname.to_string()));
        params.push(("api_type", "json".to_string()));

        let body = self
            .http
            .post_form(&format!("api/{}", operation), &params)?
            .text()?;
        let body = body.trim();
        if body.is_empty() || body == "{}" {
            return Ok(None);
        }
        serde_json::from_str(body).map(Some).map_err(Error::from)
    }

    fn more_children(
        &self,
        link_fullname: &str,
        children: &[String],
        limit_children: bool,
        sort: CommentSort,
        more_id: Option<&str>,
    ) -> Result<Vec<CommentData>, Error> {
        let mut query = vec![
            ("api_type", "json".to_string()),
            ("link_id", link_fullname.to_string()),
            ("children", children.join(",")),
            ("limit_children", limit_children.to_string()),
            ("sort", sort.as_str().to_string()),
        ];
        if let Some(id) = more_id {
            query.push(("id", id.to_string()));
        }

        let value: Value = self.http.get_json("api/morechildren.json", &query)?.json()?;
        if let Some(message) = models::api_errors(&value) {
            return Err(Error::Remote {
                operation: "morechildren",
                message,
            });
        }

        let things = value
            .pointer("/json/data/things")
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()));
        let children: Vec<Thing> = serde_json::from_value(things)?;
        let listing = ListingData {
            after: None,
            before: None,
            children,
        };
        Ok(Replies::from_listing(listing)?.comments)
    }
}

/// Form key the endpoint reads the fullname from.
fn id_param(operation: &str) -> &'static str {
    if operation == "report" {
        "thing_id"
    } else {
        "id"
    }
}

fn comment_query(options: &CommentOptions) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("raw_json", "1".to_string()),
        ("sort", options.sort.as_str().to_string()),
        ("context", options.context.to_string()),
        ("truncate", options.truncate.to_string()),
        ("showedits", options.show_edits.to_string()),
        ("showmore", options.show_more.to_string()),
        ("threaded", options.threaded.to_string()),
    ];
    if let Some(depth) = options.depth {
        query.push(("depth", depth.to_string()));
    }
    if let Some(limit) = options.limit {
        query.push(("limit", limit.to_string()));
    }
    if options.sr_detail {
        query.push(("sr_detail", "true".to_string()));
    }
    query
}

impl HttpClient {
    fn get_json(&self, path: &str, query: &[(&'static str, String)]) -> Result<Response, Error> {
        let url = self.base_url.join(path)?;
        info!("GET {}", url.as_str());

        self.reqwest
            .get(url)
            .header(ACCEPT, "application/json")
            .query(query)
            .send()?
            .error_for_status()
            .map_err(Error::from)
    }

    fn post_form<B>(&self, path: &str, body: &B) -> Result<Response, Error>
    where
        B: Serialize + ?Sized,
    {
        let url = self.base_url.join(path)?;
        info!("POST {}", url.as_str());

        self.reqwest
            .post(url)
            .form(body)
            .send()?
            .error_for_status()
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_addresses_things_differently() {
        assert_eq!(id_param("report"), "thing_id");
        assert_eq!(id_param("del"), "id");
        assert_eq!(id_param("set_subreddit_sticky"), "id");
    }

    #[test]
    fn optional_query_parameters_are_omitted() {
        let options = CommentOptions::default();
        let query = comment_query(&options);
        assert!(query.iter().all(|(key, _)| *key != "depth"));
        assert!(query.iter().all(|(key, _)| *key != "limit"));
        assert!(query.iter().all(|(key, _)| *key != "sr_detail"));

        let options = CommentOptions {
            depth: Some(2),
            limit: Some(100),
            sr_detail: true,
            ..CommentOptions::default()
        };
        let query = comment_query(&options);
        assert!(query.contains(&("depth", "2".to_string())));
        assert!(query.contains(&("limit", "100".to_string())));
        assert!(query.contains(&("sr_detail", "true".to_string())));
    }
}
