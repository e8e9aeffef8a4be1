use std::ops::Deref;

use derive_new::new;

use crate::{database::Database, service::stats::StatsService};

#[derive(Debug, Clone, new)]
pub struct App {
    pub service: StatsService<Database>,
}

impl Deref for App {
    type Target = StatsService<Database>;

    fn deref(&self) -> &Self::Target {
        &self.service
    }
}

pub fn create_app(database: Database) -> App {
    App::new(StatsService::new(database))
}
