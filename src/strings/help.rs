//! Help text shown by `.help`.

pub const HELP: &str = "\
**skylark** stream relay commands:

- `.post <text>` - post to the upstream account (long text is split)
- `.repost <id|last>` - repost by id, or the last one seen (`.rt` works too)
- `.reply <id|last> <text>` - reply to a post; the @mention is added for you
- `.follow <user>` / `.unfollow <user>` - manage who the stream follows
- `.restart` - restart the stream worker
- `.status` - relay state and the last post seen
- `.help` - this message

Ids can be abbreviated to their trailing digits (at least 2).";
