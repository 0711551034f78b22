use clap::{Args, Subcommand};
use placebook_core::errors::Result;
use placebook_core::model::NewPlace;
use placebook_engine::{apply_engine_command, Engine, EngineCommand};
use std::path::PathBuf;

use super::{bearer, print_result, read_upload};

#[derive(Debug, Args)]
pub struct PlaceArgs {
    #[command(subcommand)]
    pub command: PlaceCommand,
}

#[derive(Debug, Subcommand)]
pub enum PlaceCommand {
    /// Create a place owned by the token's user
    Create(CreateArgs),
    /// Show one place
    Show { place_id: String },
    /// List a user's places
    List {
        #[arg(long)]
        user: String,
    },
    /// Change title and description
    Update(UpdateArgs),
    /// Delete a place and its image
    Delete {
        place_id: String,

        #[arg(long)]
        token: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub token: Option<String>,

    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub description: String,

    #[arg(long)]
    pub address: String,

    /// Place image (png or jpeg)
    #[arg(long)]
    pub image: PathBuf,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub place_id: String,

    #[arg(long)]
    pub token: Option<String>,

    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub description: String,
}

pub fn execute(args: PlaceArgs, engine: &Engine) -> Result<()> {
    let cmd = match args.command {
        PlaceCommand::Create(a) => EngineCommand::PlaceCreate {
            authorization: bearer(a.token),
            fields: NewPlace {
                title: a.title,
                description: a.description,
                address: a.address,
            },
            image: read_upload(&a.image)?,
        },
        PlaceCommand::Show { place_id } => EngineCommand::PlaceGet { place_id },
        PlaceCommand::List { user } => EngineCommand::PlacesByUser { user_id: user },
        PlaceCommand::Update(a) => EngineCommand::PlaceUpdate {
            authorization: bearer(a.token),
            place_id: a.place_id,
            title: a.title,
            description: a.description,
        },
        PlaceCommand::Delete { place_id, token } => EngineCommand::PlaceDelete {
            authorization: bearer(token),
            place_id,
        },
    };

    let result = apply_engine_command(cmd, engine)?;
    print_result(&result);
    Ok(())
}
