#![allow(dead_code)]

use daddi::persist::{self, ResultSet};
use daddi::query::{assemble, filter_search_criteria, ResultKind};
use rusqlite::Connection;

// The parts of the idioms schema the search templates touch, plus a handful
// of idioms and sentences.
const SCHEMA: &str = "
create table answerset (
    answerset_id text not null primary key,
    answerset_name text not null,
    answerset_description text
);
create table parameterDefinition (
    parameter_definition_id text not null primary key,
    entity text not null
);
create table strategy (
    strategy_id integer not null primary key,
    strategy_name text not null,
    strategy_description text,
    strategy_answerset_id text references answerset(answerset_id)
);
create table sentence (
    sentence_id integer not null primary key,
    sentence_strategy_id integer references strategy(strategy_id),
    sentence_answerset_id text references answerset(answerset_id),
    original text,
    gloss text,
    translation text,
    grammaticality text
);
create table strategy_data (
    strategy_id integer not null,
    parameter_definition_id text not null,
    parameter_value text
);
create table sentence_data (
    sentence_id integer not null,
    parameter_definition_id text not null,
    parameter_value text
);
create view strategy_data_all as
    select i.strategy_id, p.parameter_definition_id, coalesce(d.parameter_value, '0') as parameter_value
    from strategy i
    cross join parameterDefinition p
    left join strategy_data d
    on d.strategy_id = i.strategy_id and d.parameter_definition_id = p.parameter_definition_id
    where p.entity = 'strategy';
create view sentence_data_all as
    select s.sentence_id, p.parameter_definition_id, coalesce(d.parameter_value, '0') as parameter_value
    from sentence s
    cross join parameterDefinition p
    left join sentence_data d
    on d.sentence_id = s.sentence_id and d.parameter_definition_id = p.parameter_definition_id
    where p.entity = 'sentence';
create table parameter_labels (
    param_get text not null primary key,
    group_entity text,
    group_label text,
    question_statement text
);
";

const DATA: &str = "
insert into answerset values
    ('Brabants', 'Brabants', 'Brabantian'),
    ('Dendermonds', 'Dendermonds', 'East Flemish'),
    ('Drents', 'Drents', 'Low Saxon'),
    ('Gronings', 'Gronings', 'Low Saxon');
insert into parameterDefinition values
    ('OpenAnimacy1', 'strategy'),
    ('Voice1', 'strategy'),
    ('GenStructure1', 'strategy'),
    ('IdiomNotes1', 'strategy'),
    ('Property1', 'sentence'),
    ('s:judgments1', 'sentence');
insert into strategy values
    (1, 'ergens zijn', 'ergens aanwezig zijn', 'Dendermonds'),
    (2, 'de pijp uitgaan', 'sterven', 'Drents'),
    (3, 'zijn draai vinden', 'zich thuis voelen', 'Gronings'),
    (4, 'de kat uit de boom kijken', 'afwachten', 'Brabants');
insert into strategy_data values
    (1, 'OpenAnimacy1', 'Animate'),
    (2, 'OpenAnimacy1', 'Inanimate'),
    (4, 'OpenAnimacy1', 'animate'),
    (1, 'Voice1', 'Active'),
    (2, 'Voice1', 'Passive'),
    (3, 'Voice1', 'Active'),
    (1, 'GenStructure1', 'V DO'),
    (2, 'GenStructure1', 'DO V'),
    (3, 'GenStructure1', 'V PP DO'),
    (4, 'GenStructure1', 'PP V'),
    (2, 'IdiomNotes1', 'Also heard in Twente');
insert into sentence values
    (10, 1, 'Dendermonds', 'hij is ergens', 'he is somewhere', 'He is around.', 'ok'),
    (11, 1, 'Dendermonds', 'zij zijn ergens', 'they are somewhere', 'They are around.', '?'),
    (20, 2, 'Drents', 'hij gaat de pijp uit', 'he goes the pipe out', 'He dies.', '*'),
    (30, 3, 'Gronings', 'hij vindt zijn draai', 'he finds his turn', 'He settles in.', '%'),
    (40, 4, 'Brabants', 'zij kijkt de kat uit de boom', 'she looks the cat out the tree', 'She waits and sees.', '?*');
insert into sentence_data values
    (10, 'Property1', 'DefiniteDeterminer'),
    (20, 'Property1', 'DefiniteDeterminer'),
    (30, 'Property1', 'Tense'),
    (10, 's:judgments1', 'All speakers accept this'),
    (20, 's:judgments1', 'Rejected by older speakers');
insert into parameter_labels values
    ('Dialect', 'Answerset', 'Dialect', null),
    ('Voice', 'Idiom', 'Verb phrase', 'Voice'),
    ('Idiom', 'Idiom', '', 'Idiom text');
";

const FULL_TEXT: &str = "
create virtual table strategy_fts using fts5(strategy_id unindexed, strategy_name, strategy_description);
insert into strategy_fts select strategy_id, strategy_name, strategy_description from strategy;
create virtual table sentence_fts using fts5(sentence_id unindexed, original, gloss, translation);
insert into sentence_fts select sentence_id, original, gloss, translation from sentence;
create virtual table strategy_data_fts using fts5(strategy_id unindexed, parameter_definition_id unindexed, parameter_value);
insert into strategy_data_fts select strategy_id, parameter_definition_id, parameter_value from strategy_data;
create virtual table sentence_data_fts using fts5(sentence_id unindexed, parameter_definition_id unindexed, parameter_value);
insert into sentence_data_fts select sentence_id, parameter_definition_id, parameter_value from sentence_data;
";

/// In-memory idioms database, prepared like a served one.
pub fn fixture() -> Connection {
    let connection = Connection::open_in_memory().expect("in-memory database");
    connection.execute_batch(SCHEMA).expect("schema");
    connection.execute_batch(DATA).expect("data");
    connection.execute_batch(FULL_TEXT).expect("full-text indexes");
    persist::prepare_connection(&connection).expect("prepared connection");
    connection
}

/// Filter, assemble and execute a search as the server does.
pub fn search(connection: &Connection, kind: ResultKind, pairs: &[(&str, &str)]) -> daddi::Result<ResultSet> {
    let criteria = filter_search_criteria(pairs.iter().copied());
    persist::execute(connection, &assemble(&criteria, kind))
}

/// Row count of a search that is expected to succeed.
pub fn count(connection: &Connection, kind: ResultKind, pairs: &[(&str, &str)]) -> usize {
    search(connection, kind, pairs).expect("search ok").row_count
}

/// One column of every row, as text.
pub fn column(result: &ResultSet, name: &str) -> Vec<String> {
    (0..result.row_count)
        .map(|row| match result.value(row, name) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        })
        .collect()
}
