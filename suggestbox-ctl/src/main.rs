use anyhow::Context;
use suggestbox_api::{
    Board, Error, NewComment, NewSuggestion, SessionToken, Suggestion, SuggestionId, Uuid,
};

#[derive(structopt::StructOpt)]
struct Opt {
    #[structopt(short, long)]
    host: String,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// Start a session and print its token
    NewSession,

    /// End the session named by SUGGESTBOX_SESSION
    EndSession,

    /// Submit a suggestion
    Submit {
        /// Board to post on, public or private
        #[structopt(short, long, default_value = "public")]
        board: Board,

        /// Hide the author name
        #[structopt(short, long)]
        anonymous: bool,

        /// Author name
        #[structopt(long, default_value = "")]
        author: String,

        body: String,
    },

    /// Comment on a public suggestion
    Comment {
        suggestion: Uuid,

        /// Hide the author name
        #[structopt(short, long)]
        anonymous: bool,

        /// Author name
        #[structopt(long, default_value = "")]
        author: String,

        body: String,
    },

    /// List the public board, most recent first
    ListPublic,

    /// List this session's private suggestions, most recent first
    ListPrivate,
}

fn session_token() -> anyhow::Result<SessionToken> {
    let tok = std::env::var("SUGGESTBOX_SESSION")
        .context("retrieving SUGGESTBOX_SESSION environment variable")?;
    let tok = Uuid::try_parse(&tok).context("parsing SUGGESTBOX_SESSION as a session token")?;
    Ok(SessionToken(tok))
}

/// Turns an error response into the error the server reported
async fn check(resp: reqwest::Response) -> anyhow::Result<reqwest::Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let body = resp.bytes().await.context("reading error response")?;
    Err(Error::parse(&body)?.into())
}

async fn get<R>(client: &reqwest::Client, host: &str, path: &str) -> anyhow::Result<R>
where
    R: for<'de> serde::Deserialize<'de>,
{
    let resp = client
        .get(format!("{host}/api/{path}"))
        .bearer_auth(session_token()?.0)
        .send()
        .await?;
    Ok(check(resp).await?.json().await?)
}

fn print_board(suggestions: &[Suggestion]) {
    if suggestions.is_empty() {
        println!("No suggestions yet.");
    }
    for s in suggestions {
        println!("[{}] {} ({})", s.id.0, s.author, s.display_date());
        println!("    {}", s.body);
        for c in &s.comments {
            println!("    > {}: {}", c.author, c.body);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opt = <Opt as structopt::StructOpt>::from_args();

    let client = reqwest::Client::new();

    match opt.cmd {
        Command::NewSession => {
            let resp = client
                .post(format!("{}/api/session", opt.host))
                .send()
                .await?;
            let tok: SessionToken = check(resp).await?.json().await?;
            println!("{}", tok.0);
        }
        Command::EndSession => {
            let resp = client
                .post(format!("{}/api/end-session", opt.host))
                .bearer_auth(session_token()?.0)
                .send()
                .await?;
            check(resp).await?;
        }
        Command::Submit {
            board,
            anonymous,
            author,
            body,
        } => {
            let resp = client
                .post(format!("{}/api/submit-suggestion", opt.host))
                .json(&NewSuggestion {
                    board,
                    anonymous,
                    author,
                    body,
                })
                .bearer_auth(session_token()?.0)
                .send()
                .await?;
            let id: SuggestionId = check(resp).await?.json().await?;
            println!("{}", id.0);
        }
        Command::Comment {
            suggestion,
            anonymous,
            author,
            body,
        } => {
            let resp = client
                .post(format!("{}/api/submit-comment", opt.host))
                .json(&NewComment {
                    suggestion: SuggestionId(suggestion),
                    anonymous,
                    author,
                    body,
                })
                .bearer_auth(session_token()?.0)
                .send()
                .await?;
            check(resp).await?;
        }
        Command::ListPublic => {
            print_board(&get::<Vec<Suggestion>>(&client, &opt.host, "fetch-public").await?)
        }
        Command::ListPrivate => {
            print_board(&get::<Vec<Suggestion>>(&client, &opt.host, "fetch-private").await?)
        }
    }

    Ok(())
}
