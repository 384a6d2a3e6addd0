use std::{env, error::Error, process::exit};

use clap::Parser;
use jsonwebtoken::EncodingKey;
use time::{Duration, OffsetDateTime};

use pocketbook_rs::{DEFAULT_TOKEN_DURATION, OwnerId, encode_token};

/// A utility for minting a bearer token for the REST API server of pocketbook_rs.
///
/// The token is signed with the secret in the `SECRET` environment variable,
/// which must match the one the server is started with.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The ID of the owner the token is issued to.
    #[arg(long)]
    owner_id: i64,

    /// How many days the token stays valid for.
    #[arg(long, default_value_t = DEFAULT_TOKEN_DURATION.whole_days())]
    days: i64,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if args.days <= 0 {
        eprintln!("--days must be greater than 0");
        exit(1);
    }

    let secret = match env::var("SECRET") {
        Ok(secret) => secret,
        Err(_) => {
            eprintln!("The environment variable 'SECRET' must be set");
            exit(1);
        }
    };

    let token = encode_token(
        OwnerId::new(args.owner_id),
        OffsetDateTime::now_utc(),
        Duration::days(args.days),
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    println!("{token}");

    Ok(())
}
