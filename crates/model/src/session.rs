use std::ops::{Deref, DerefMut};

use bson::oid::ObjectId;
use mongodb::ClientSession;

/// Database session carrying the explicit company scope. Every core call
/// receives it as a parameter; there is no ambient "current company".
pub struct Session {
    client_session: ClientSession,
    company: ObjectId,
}

impl Session {
    pub fn new(client_session: ClientSession, company: ObjectId) -> Self {
        Session {
            client_session,
            company,
        }
    }

    pub fn company(&self) -> ObjectId {
        self.company
    }
}

impl Deref for Session {
    type Target = ClientSession;

    fn deref(&self) -> &Self::Target {
        &self.client_session
    }
}

impl DerefMut for Session {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.client_session
    }
}

impl<'a> From<&'a mut Session> for &'a mut ClientSession {
    fn from(session: &'a mut Session) -> &'a mut ClientSession {
        &mut session.client_session
    }
}
