/// Ticket handed out when a fetch is issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

/// Monotonic request sequencing for fetches that may complete out of order
///
/// A response is accepted only if its ticket is newer than the last accepted
/// one, so a slow older request can never overwrite a newer result.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: u64,
    accepted: u64,
}

impl RequestSequencer {
    pub fn issue(&mut self) -> RequestTicket {
        self.issued += 1;
        RequestTicket(self.issued)
    }

    /// Returns `false` for responses older than the currently accepted one
    pub fn accept(&mut self, ticket: RequestTicket) -> bool {
        if ticket.0 <= self.accepted {
            return false;
        }
        self.accepted = ticket.0;
        true
    }

    pub fn in_flight(&self) -> u64 {
        self.issued - self.accepted
    }
}
