//! Fake browser platforms for slipping past the Great Bear Council.
//!
//! The council knows every representative favours a different operating
//! system and browser, so each voting attempt presents a randomly chosen
//! (OS, user-agent) pair. The pair stays fixed for the whole attempt and
//! is regenerated when an attempt fails.

use rand::seq::SliceRandom;

/// A faked browser identity: operating-system label plus user-agent string.
///
/// The OS label ends up inside the `daxiongmao.js` request URL and must be
/// consistent with the user-agent sent on every request of the attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    pub os: &'static str,
    pub user_agent: &'static str,
}

/// Candidate platforms the council considers plausible voters.
const ALL_PLATFORMS: &[Fingerprint] = &[
    Fingerprint {
        os: "Win32",
        user_agent: "Mozilla/5.0 (Windows NT 5.1 rv: 52.0) Gecko/20100101 Firefox/52.0",
    },
    Fingerprint {
        os: "Win64",
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/89.0.4389.82 Safari/537.36",
    },
    Fingerprint {
        os: "MacIntel",
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Safari/605.1.15",
    },
    Fingerprint {
        os: "iPhone",
        user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 14_2 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Mobile/15E148 Safari/604.1",
    },
    Fingerprint {
        os: "iPad",
        user_agent: "Mozilla/5.0 (iPad; CPU OS 14_2 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Mobile/15E148 Safari/604.1",
    },
    Fingerprint {
        os: "Linux i686",
        user_agent: "Mozilla/5.0 (X11; Linux i686; rv:52.0) Gecko/20100101 Firefox/52.0",
    },
    Fingerprint {
        os: "Linux x86_64",
        user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/89.0.4389.82 Safari/537.36",
    },
    Fingerprint {
        os: "FreeBSD i386",
        user_agent: "Mozilla/5.0 (FreeBSD; U; FreeBSD i386; en-US) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/79.0.3945.79 Safari/537.36",
    },
    Fingerprint {
        os: "FreeBSD amd64",
        user_agent: "Mozilla/5.0 (FreeBSD; U; FreeBSD amd64; en-US) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/79.0.3945.79 Safari/537.36",
    },
    Fingerprint {
        os: "OpenBSD i386",
        user_agent: "Mozilla/5.0 (X11; OpenBSD i386; rv:52.0) Gecko/20100101 Firefox/52.0",
    },
    Fingerprint {
        os: "OpenBSD amd64",
        user_agent: "Mozilla/5.0 (X11; OpenBSD amd64; rv:52.0) Gecko/20100101 Firefox/52.0",
    },
    Fingerprint {
        os: "SunOS i86pc",
        user_agent: "Mozilla/5.0 (X11; SunOS i86pc) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/89.0.4389.82 Safari/537.36",
    },
    Fingerprint {
        os: "SunOS sun4u",
        user_agent: "Mozilla/5.0 (X11; SunOS sun4u) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/89.0.4389.82 Safari/537.36",
    },
    Fingerprint {
        os: "Android",
        user_agent: "Mozilla/5.0 (Android; Mobile; rv:58.0) Gecko/58.0 Firefox/58.0",
    },
];

impl Fingerprint {
    /// Draw a random platform from the candidate list.
    pub fn random() -> Self {
        *ALL_PLATFORMS
            .choose(&mut rand::thread_rng())
            .expect("platform list is non-empty")
    }

    /// Draw a random platform different from `previous`.
    ///
    /// A retried attempt must not reuse the identity the council just
    /// rejected.
    pub fn random_excluding(previous: &Fingerprint) -> Self {
        loop {
            let candidate = Self::random();
            if candidate != *previous {
                return candidate;
            }
        }
    }
}
