/*
    family-playlist-export | Rust CLI tool to export family playlists with Qobuz links.
    Copyright (C) 2025  The family-playlist-export contributors

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

/// Search page of the Qobuz US catalog. The encoded query is appended as-is.
pub const QOBUZ_SEARCH_URL: &str = "https://www.qobuz.com/us-en/search?q=";

/// Builds a Qobuz search link for a track.
///
/// The query is `"{artist} {track}"` encoded as a form value: unreserved
/// characters are kept, spaces become `+` and everything else is
/// percent-encoded (a literal `+` becomes `%2B`).
pub fn generate_link(track_name: &str, artist_name: &str) -> String {
    let query = format!("{} {}", artist_name, track_name);
    format!("{}{}", QOBUZ_SEARCH_URL, encode_query_value(&query))
}

fn encode_query_value(value: &str) -> String {
    // `urlencoding` emits %20 for spaces; any literal '+' is already %2B.
    urlencoding::encode(value).replace("%20", "+")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded_query(link: &str) -> String {
        let raw = link
            .strip_prefix(QOBUZ_SEARCH_URL)
            .expect("link should start with the search URL");
        urlencoding::decode(&raw.replace('+', " "))
            .expect("query should be valid UTF-8")
            .into_owned()
    }

    #[test]
    fn test_blue_monday() {
        let link = generate_link("Blue Monday", "New Order");
        assert_eq!(
            link,
            "https://www.qobuz.com/us-en/search?q=New+Order+Blue+Monday"
        );
        assert_eq!(decoded_query(&link), "New Order Blue Monday");
    }

    #[test]
    fn test_punctuation_is_percent_encoded() {
        let link = generate_link("What's Going On?", "Marvin Gaye");
        assert_eq!(
            link,
            "https://www.qobuz.com/us-en/search?q=Marvin+Gaye+What%27s+Going+On%3F"
        );
    }

    #[test]
    fn test_literal_plus_and_ampersand_survive() {
        let link = generate_link("1+1 & You", "Beyoncé");
        let query = link.strip_prefix(QOBUZ_SEARCH_URL).unwrap();

        assert!(!query.contains('&'));
        assert!(query.contains("%2B"));
        assert_eq!(decoded_query(&link), "Beyoncé 1+1 & You");
    }

    #[test]
    fn test_empty_input_still_builds_a_link() {
        let link = generate_link("", "");
        assert_eq!(link, "https://www.qobuz.com/us-en/search?q=+");
        assert_eq!(decoded_query(&link), " ");
    }

    #[test]
    fn test_decoded_query_is_artist_then_track() {
        let cases = [
            ("Hey Jude", "The Beatles"),
            ("Bohemian Rhapsody", "Queen"),
            ("Águas de Março", "Elis Regina"),
            ("100% Pure Love", "Crystal Waters"),
            ("a/b?c=d#e", "x~y_z.w-v"),
            ("  spaced  out  ", "  "),
            ("東京", "椎名林檎"),
        ];

        for (track, artist) in cases {
            let link = generate_link(track, artist);
            assert!(!link.contains(' '), "unencoded space in {}", link);
            assert_eq!(decoded_query(&link), format!("{} {}", artist, track));
        }
    }
}
