use clap::{Args, Subcommand};
use placebook_core::errors::Result;
use placebook_core_types::Sensitive;
use placebook_engine::{apply_engine_command, Engine, EngineCommand};
use std::path::PathBuf;

use super::{print_result, read_upload};

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create an account and print its token
    Signup(SignupArgs),
    /// Exchange email and password for a token
    Login(LoginArgs),
    /// List every user
    List,
}

#[derive(Debug, Args)]
pub struct SignupArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,

    /// Avatar image (png or jpeg)
    #[arg(long)]
    pub image: PathBuf,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,
}

pub fn execute(args: UserArgs, engine: &Engine) -> Result<()> {
    let cmd = match args.command {
        UserCommand::Signup(a) => EngineCommand::Signup {
            name: a.name,
            email: a.email,
            password: Sensitive::new(a.password),
            image: read_upload(&a.image)?,
        },
        UserCommand::Login(a) => EngineCommand::Login {
            email: a.email,
            password: Sensitive::new(a.password),
        },
        UserCommand::List => EngineCommand::UsersList,
    };

    let result = apply_engine_command(cmd, engine)?;
    print_result(&result);
    Ok(())
}
