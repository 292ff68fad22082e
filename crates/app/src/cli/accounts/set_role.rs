use clap::Args;
use storefront_app::{
    database::{self, Db},
    domain::users::{PgUsersService, UsersService, records::{Role, UserUuid}},
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct SetRoleArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Account to update
    #[arg(long)]
    user_uuid: Uuid,

    /// New role: regular or premium
    #[arg(long)]
    role: String,
}

pub(crate) async fn run(args: SetRoleArgs) -> Result<(), String> {
    let role = args
        .role
        .parse::<Role>()
        .map_err(|error| format!("invalid role: {error}"))?;

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let user = PgUsersService::new(Db::new(pool), None)
        .change_role(UserUuid::from_uuid(args.user_uuid), role)
        .await
        .map_err(|error| format!("failed to change role: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("email: {}", user.email);
    println!("role: {}", user.role);

    Ok(())
}
