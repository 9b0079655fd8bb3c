//! Remote listing

/// A configured remote with its fetch and push URLs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemoteInfo {
    pub name: String,
    pub fetch_url: String,
    pub push_url: String,
}

impl RemoteInfo {
    /// Whether both URLs already point at `url`.
    pub fn points_to(&self, url: &str) -> bool {
        self.fetch_url == url && self.push_url == url
    }
}

/// Parse `git remote -v` output.
///
/// Lines look like `origin\thttps://host/repo.git (fetch)`. Remotes are
/// returned in first-seen order.
pub fn parse_remote_verbose(output: &str) -> Vec<RemoteInfo> {
    let mut remotes: Vec<RemoteInfo> = Vec::new();

    for line in output.lines() {
        let Some((name, rest)) = line.split_once(|c: char| c.is_whitespace()) else {
            continue;
        };
        let rest = rest.trim();
        let (url, kind) = match rest.rsplit_once(' ') {
            Some((url, kind)) => (url.trim(), kind),
            None => (rest, "(fetch)"),
        };

        let index = match remotes.iter().position(|r| r.name == name) {
            Some(i) => i,
            None => {
                remotes.push(RemoteInfo {
                    name: name.to_string(),
                    ..Default::default()
                });
                remotes.len() - 1
            }
        };

        match kind {
            "(push)" => remotes[index].push_url = url.to_string(),
            _ => remotes[index].fetch_url = url.to_string(),
        }
    }

    remotes
}
