//! Central user database handlers.
//!
//! Every mutation is replicated to the connected devices before the
//! command returns.

use tabled::Tabled;

use gatefleet_core::{
    AdjustCreditRequest, CentralUser, CreateUserRequest, Fleet, UpdateUserRequest,
};

use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "UID")]
    uid: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Credit")]
    credit: i64,
    #[tabled(rename = "Type")]
    user_type: String,
    #[tabled(rename = "Inside")]
    inside: &'static str,
}

impl From<&CentralUser> for UserRow {
    fn from(u: &CentralUser) -> Self {
        Self {
            uid: u.uid.clone(),
            name: u.name.clone(),
            credit: u.credit,
            user_type: u.user_type.to_string(),
            inside: if u.inside { "yes" } else { "no" },
        }
    }
}

fn detail(u: &CentralUser) -> String {
    [
        format!("UID:     {}", u.uid),
        format!("Name:    {}", u.name),
        format!("Credit:  {}", u.credit),
        format!("Type:    {}", u.user_type),
        format!("Inside:  {}", if u.inside { "yes" } else { "no" }),
        format!("Created: {}", u.created_at.to_rfc3339()),
        format!(
            "Updated: {}",
            u.updated_at.map_or_else(|| "-".into(), |t| t.to_rfc3339())
        ),
    ]
    .join("\n")
}

pub async fn handle(fleet: &Fleet, args: UsersArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let fmt = &global.output;

    if let UsersCommand::List = args.command {
        let users = fleet.users().await;
        let out = output::render_list(fmt, &users, |u| UserRow::from(u), |u| u.uid.clone());
        output::print_output(&out, global.quiet);
        return Ok(());
    }

    if let UsersCommand::Remove { ref uid } = args.command {
        let prompt = format!("Remove user {uid}?");
        if !util::confirm("users remove", &prompt, global.yes)? {
            return Ok(());
        }
    }

    let mut reports = fleet.sync_reports();
    fleet.start().await;

    let user = match args.command {
        UsersCommand::Add {
            uid,
            name,
            credit,
            user_type,
        } => {
            fleet
                .add_user(CreateUserRequest {
                    uid,
                    name,
                    credit,
                    user_type,
                })
                .await?
        }
        UsersCommand::Update {
            uid,
            name,
            credit,
            user_type,
            inside,
        } => {
            fleet
                .update_user(UpdateUserRequest {
                    uid,
                    name,
                    credit,
                    user_type,
                    inside,
                })
                .await?
        }
        UsersCommand::Remove { uid } => fleet.remove_user(&uid).await?,
        UsersCommand::Credit { uid, amount } => {
            fleet
                .adjust_credit(AdjustCreditRequest { uid, amount })
                .await?
        }
        UsersCommand::List => return Ok(()),
    };

    let out = output::render_single(fmt, &user, detail, |u| u.uid.clone());
    output::print_output(&out, global.quiet);

    util::await_replication(fleet, &mut reports, global).await;
    Ok(())
}
