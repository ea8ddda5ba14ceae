use crate::{Data, Error};

mod id_commands;

pub fn slash_commands_bundle() -> Vec<poise::Command<Data, Error>> {
    vec![
        id_commands::assign_existing(),
        id_commands::getid(),
        id_commands::refreshid(),
        id_commands::listids(),
    ]
}
