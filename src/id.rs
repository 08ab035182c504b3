use rand::{distributions::Alphanumeric, Rng};

pub const ID_LEN: usize = 5;

/// Random `[A-Za-z0-9]` id of `len` characters.
pub fn make_id(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Draws ids until one is not `taken`.
pub fn unique_id(taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = make_id(ID_LEN);
        if !taken(&id) {
            return id;
        }
    }
}
