use super::*;
use std::fs;
use tempfile::TempDir;

const SAMPLE_TSV: &str = "N1\tnews\tmarkets\tStocks rally\tMarket up today\thttps://example.com/n1\n\
N2\tweather\tforecast\tWeather report\t\thttps://example.com/n2\n\
N3\tnews\tmarkets\tStock market\tRally continues\n\
N4\tsports\tsoccer\t\tA match without a title\n\
N1\tnews\tmarkets\tDuplicate id\tShould be dropped\n";

#[test]
fn from_reader_drops_rows_missing_text() {
    let corpus = CorpusStore::from_reader(SAMPLE_TSV.as_bytes()).expect("sample parses");

    let ids: Vec<&str> = corpus.ids().collect();
    assert_eq!(ids, vec!["N1", "N3"]);

    let stats = corpus.stats();
    assert_eq!(stats.rows_read, 5);
    assert_eq!(stats.missing_text, 2);
    assert_eq!(stats.duplicate_ids, 1);
    assert_eq!(stats.malformed_rows, 0);
}

#[test]
fn positional_fields_are_mapped() {
    let corpus = CorpusStore::from_reader(SAMPLE_TSV.as_bytes()).expect("sample parses");

    let first = corpus.get(0).expect("first article exists");
    assert_eq!(first.category, "news");
    assert_eq!(first.subcategory, "markets");
    assert_eq!(first.title, "Stocks rally");
    assert_eq!(first.body, "Market up today");
    assert_eq!(first.url.as_deref(), Some("https://example.com/n1"));

    let second = corpus.get(1).expect("second article exists");
    assert_eq!(second.url, None);
}

#[test]
fn quotes_are_kept_verbatim() {
    let data = "N9\tnews\tpolitics\t\"Quoted\" headline\tHe said \"no\" twice\n";
    let corpus = CorpusStore::from_reader(data.as_bytes()).expect("row parses");

    let article = corpus.get(0).expect("article exists");
    assert_eq!(article.title, "\"Quoted\" headline");
    assert_eq!(article.body, "He said \"no\" twice");
}

#[test]
fn short_rows_are_dropped_not_rejected() {
    let data = "N1\tnews\n\nN2\tnews\tsub\tTitle\tBody\n";
    let corpus = CorpusStore::from_reader(data.as_bytes()).expect("rows parse");

    assert_eq!(corpus.len(), 1);
    assert_eq!(corpus.get(0).map(|a| a.id.as_str()), Some("N2"));
}

#[test]
fn combined_text_joins_title_and_body() {
    let article = Article::new("A1", "stocks rally", "market up today");
    assert_eq!(article.combined_text(), "stocks rally market up today");
}

#[test]
fn query_matching_is_case_insensitive() {
    let corpus = Corpus::from_articles(vec![
        Article::new("A1", "Stocks Rally", "Market up today"),
        Article::new("A2", "Weather Report", "Rain expected"),
        Article::new("A3", "Stock market", "RALLY continues"),
    ]);

    let matches = |needle: &str| corpus.positions_mentioning(needle).collect::<Vec<_>>();
    assert_eq!(matches("weather"), vec![1]);
    assert_eq!(matches("rain exp"), vec![1]);
    assert_eq!(matches("rally"), vec![0, 2]);
    assert!(matches("sports").is_empty());
}

#[test]
fn query_does_not_span_title_and_body() {
    let corpus = Corpus::from_articles(vec![Article::new("A1", "stocks rally", "market up")]);
    assert_eq!(corpus.positions_mentioning("rally market").count(), 0);
}

#[test]
fn dropped_rows_are_never_matched() {
    let corpus = Corpus::from_articles(vec![
        Article::new("A1", "weather", ""),
        Article::new("A2", "weather report", "rain expected"),
        Article::new("A2", "weather again", "duplicate id"),
    ]);
    assert_eq!(corpus.positions_mentioning("weather").collect::<Vec<_>>(), vec![0]);
}

#[test]
fn load_missing_file_is_an_error() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let result = CorpusStore::load(temp_dir.path().join("missing.tsv"));
    assert!(matches!(result, Err(CorpusError::Open { .. })));
}

#[test]
fn load_or_empty_degrades_gracefully() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let corpus = CorpusStore::load_or_empty(temp_dir.path().join("missing.tsv"));
    assert!(corpus.is_empty());
}

#[test]
fn load_from_disk() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("news.tsv");
    fs::write(&path, SAMPLE_TSV).expect("should write corpus file");

    let corpus = CorpusStore::load(&path).expect("corpus loads");
    assert_eq!(corpus.len(), 2);
}

#[test]
fn empty_file_yields_empty_corpus() {
    let corpus = CorpusStore::from_reader("".as_bytes()).expect("empty input parses");
    assert!(corpus.is_empty());
    assert_eq!(corpus.stats().rows_read, 0);
}
