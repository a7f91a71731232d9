// crates/feed-parser/examples/parse_feed.rs
//! Example of parsing RSS and Atom feeds
//!
//! Run with a file to parse it, or without arguments for the built-in samples:
//! `cargo run --example parse_feed -- path/to/feed.xml`

use readerkit_feed_parser::{FeedParser, ParsedFeed};

const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">
  <channel>
    <title>Example News</title>
    <link>https://news.example.com/</link>
    <atom:link rel="self" href="https://news.example.com/rss.xml"/>
    <item>
      <title>First story</title>
      <link>https://news.example.com/1</link>
      <pubDate>Mon, 01 Jan 2024 12:00:00 GMT</pubDate>
      <description>&lt;p&gt;Hello &lt;img src="/img/1.png"&gt;&lt;/p&gt;</description>
    </item>
    <item>
      <description>No title, no link, no guid</description>
    </item>
  </channel>
</rss>"#;

const ATOM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Example Blog</title>
  <link rel="self" href="https://blog.example.com/atom.xml"/>
  <entry>
    <id>tag:blog.example.com,2024:1</id>
    <title>Markup in Atom</title>
    <published>2024-01-01T12:00:00Z</published>
    <content type="xhtml"><div xmlns="http://www.w3.org/1999/xhtml"><p>Inline <em>XHTML</em></p></div></content>
  </entry>
</feed>"#;

fn main() {
    println!("=== readerkit Feed Parser Demo ===\n");

    if let Some(path) = std::env::args().nth(1) {
        match std::fs::read(&path) {
            Ok(bytes) => run(&path, &bytes, &format!("file://{}", path)),
            Err(e) => eprintln!("Cannot read {}: {}", path, e),
        }
        return;
    }

    run("RSS 2.0 sample", RSS.as_bytes(), "https://news.example.com/feed");
    println!();
    run("Atom sample", ATOM.as_bytes(), "https://blog.example.com/feed");
}

fn run(label: &str, bytes: &[u8], origin: &str) {
    println!("{}", label);
    println!("{}", "=".repeat(60));
    match FeedParser::parse(bytes, origin) {
        Ok(parsed) => print_feed(&parsed),
        Err(e) => println!("Failed: {}", e),
    }
}

fn print_feed(parsed: &ParsedFeed) {
    let feed = &parsed.feed;
    println!("Type:     {}", feed.feed_type);
    println!("Title:    {}", feed.title);
    println!("Address:  {}", feed.address);
    println!(
        "Articles: {} ({} skipped)\n",
        parsed.article_count(),
        parsed.skipped
    );

    for article in &parsed.articles {
        println!("  {}", article.title);
        println!("    key:  {}", article.key);
        if let Some(link) = &article.link {
            println!("    link: {}", link);
        }
        if let Some(date) = article.published {
            println!("    date: {}", date.format("%Y-%m-%d %H:%M"));
        }
        println!("    base: {}", article.base_address());
        println!("    body: {}", article.raw_description);
    }
}
