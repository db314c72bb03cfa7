//! Alliance registry.
//!
//! Pure membership bookkeeping keyed by alliance name; the world layer owns
//! all packet traffic. A session belongs to at most one alliance, and the
//! owner leaving disbands the whole thing.

/// Alliance names longer than this are rejected at creation.
pub const MAX_CLAN_NAME_LEN: usize = 6;

/// One alliance. The owner is always the first member.
#[derive(Debug, Clone, PartialEq)]
pub struct Clan {
    pub name: String,
    pub owner: u32,
    pub members: Vec<u32>,
}

/// What happened when a session was removed from its alliance.
#[derive(Debug, Clone, PartialEq)]
pub enum Departure {
    /// The owner left; every listed member (owner included) is out.
    Disbanded { name: String, members: Vec<u32> },
    /// A regular member left; `remaining` still need a roster update.
    Left { name: String, remaining: Vec<u32> },
}

/// All alliances, in creation order.
#[derive(Debug, Default)]
pub struct ClanRegistry {
    clans: Vec<Clan>,
}

impl ClanRegistry {
    /// Founds an alliance. Fails when the name is empty, too long or taken,
    /// or when the founder already belongs to one.
    pub fn create(&mut self, name: &str, owner: u32) -> Option<&Clan> {
        if name.is_empty() || name.chars().count() > MAX_CLAN_NAME_LEN {
            return None;
        }
        if self.get(name).is_some() || self.clan_of(owner).is_some() {
            return None;
        }
        self.clans.push(Clan {
            name: name.to_string(),
            owner,
            members: vec![owner],
        });
        self.clans.last()
    }

    pub fn get(&self, name: &str) -> Option<&Clan> {
        self.clans.iter().find(|c| c.name == name)
    }

    /// The alliance the given session belongs to, if any.
    pub fn clan_of(&self, id: u32) -> Option<&Clan> {
        self.clans.iter().find(|c| c.members.contains(&id))
    }

    /// Admits a session into the named alliance. Fails when the alliance
    /// does not exist or the session already belongs to one.
    pub fn welcome(&mut self, name: &str, id: u32) -> Option<&Clan> {
        if self.clan_of(id).is_some() {
            return None;
        }
        let idx = self.clans.iter().position(|c| c.name == name)?;
        self.clans[idx].members.push(id);
        Some(&self.clans[idx])
    }

    /// Owner removes a member. Owners cannot kick themselves; they leave.
    pub fn kick(&mut self, owner: u32, target: u32) -> Option<Departure> {
        let clan = self.clans.iter().find(|c| c.owner == owner)?;
        if target == owner || !clan.members.contains(&target) {
            return None;
        }
        self.remove_member(target)
    }

    /// Removes a session from whatever alliance it is in. The owner's
    /// departure disbands the alliance.
    pub fn remove_member(&mut self, id: u32) -> Option<Departure> {
        let idx = self.clans.iter().position(|c| c.members.contains(&id))?;
        if self.clans[idx].owner == id {
            let clan = self.clans.remove(idx);
            Some(Departure::Disbanded {
                name: clan.name,
                members: clan.members,
            })
        } else {
            let clan = &mut self.clans[idx];
            clan.members.retain(|&m| m != id);
            Some(Departure::Left {
                name: clan.name.clone(),
                remaining: clan.members.clone(),
            })
        }
    }

    /// Alliances in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Clan> {
        self.clans.iter()
    }

    pub fn len(&self) -> usize {
        self.clans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clans.is_empty()
    }
}
