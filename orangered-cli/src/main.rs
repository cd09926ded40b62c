use std::process;
use std::sync::Arc;

use chrono_humanize::HumanTime;
use structopt::StructOpt;

use orangered::url::Url;
use orangered::{Client, Comment, CommentOptions, CommentSort, Post, SharedDispatch, LINK_PREFIX};

#[derive(Debug)]
enum Error {
    Api(orangered::Error),
}

/// Fetch and render the comment tree of a post
#[derive(Debug, StructOpt)]
struct App {
    /// Base URL of the remote site
    #[structopt(short = "b", long = "base-url", default_value = "https://www.reddit.com/")]
    base_url: Url,

    /// Id or fullname of the post, e.g. "abc123" or "t3_abc123"
    id: String,

    /// Subreddit the post lives in
    #[structopt(short, long)]
    subreddit: Option<String>,

    /// Sort order: confidence, top, new, controversial, old, random, qa or live
    #[structopt(short = "o", long, default_value = "new")]
    sort: CommentSort,

    /// Maximum number of comments to request
    #[structopt(short, long)]
    limit: Option<u32>,

    /// Maximum depth of the requested tree
    #[structopt(short, long)]
    depth: Option<u32>,
}

fn main() {
    env_logger::init();
    let app = App::from_args();

    match run(&app) {
        Ok(()) => (),
        Err(Error::Api(err)) => {
            eprintln!("error: {}", err);
            process::exit(1);
        }
    }
}

fn run(app: &App) -> Result<(), Error> {
    let client = Client::new(app.base_url.clone())?;
    let dispatch: SharedDispatch = Arc::new(client);

    let fullname = if app.id.starts_with(LINK_PREFIX) {
        app.id.clone()
    } else {
        format!("{}{}", LINK_PREFIX, app.id)
    };

    let mut post = Post::from_fullname(dispatch, &fullname);
    if let Some(subreddit) = &app.subreddit {
        post.subreddit = subreddit.clone();
    }

    let options = CommentOptions {
        sort: app.sort,
        limit: app.limit,
        depth: app.depth,
        ..CommentOptions::default()
    };

    let comments = post.fetch_comments(&options)?;
    if comments.is_empty() {
        println!("no comments");
        return Ok(());
    }

    for comment in &comments {
        render(comment);
    }
    Ok(())
}

fn render(comment: &Comment) {
    let indent = "  ".repeat(comment.depth as usize);
    let age = comment
        .created
        .map(|created| HumanTime::from(created).to_string())
        .unwrap_or_default();

    println!("{}{} · {} points · {}", indent, comment.author, comment.score, age);
    for line in comment.body.lines() {
        println!("{}  {}", indent, line);
    }
    if !comment.more.is_empty() {
        println!("{}  ({} more replies not shown)", indent, comment.more.len());
    }
    println!();

    for reply in &comment.replies {
        render(reply);
    }
}

impl From<orangered::Error> for Error {
    fn from(err: orangered::Error) -> Self {
        Error::Api(err)
    }
}
