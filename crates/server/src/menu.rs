//! Interactive console menu over ingestion and the catalog queries.
//!
//! Generic over its input and output so it can be driven from stdin/stdout
//! or from in-memory buffers in tests.

use std::io::{self, BufRead, Write};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use screenmatch_core::{
    CatalogError, Category, Episode, IngestError, Series, SeriesCatalog, SeriesIngestor,
    TOP_LIMIT,
};

const MENU: &str = "
==== MENU ====
1 - Buscar séries
2 - Buscar episódios e salvar no banco
3 - Listar séries buscadas
4 - Buscar série por título
5 - Buscar séries por ator
6 - Top 5 séries
7 - Buscar séries por categoria
8 - Filtrar séries
9 - Buscar episódio por trecho
10 - Top 5 episódios por série
11 - Lançamentos mais recentes
0 - Sair
";

pub struct Menu<R, W> {
    catalog: Arc<dyn SeriesCatalog>,
    /// `None` when no metadata source is configured.
    ingestor: Option<SeriesIngestor>,
    input: R,
    output: W,
    /// Series found by the last title search, reused by option 10.
    last_search: Option<Series>,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(
        catalog: Arc<dyn SeriesCatalog>,
        ingestor: Option<SeriesIngestor>,
        input: R,
        output: W,
    ) -> Self {
        Self {
            catalog,
            ingestor,
            input,
            output,
            last_search: None,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until the user picks 0 or input ends.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            write!(self.output, "{}", MENU)?;
            let Some(choice) = self.read_line()? else {
                break;
            };

            let result = match choice.as_str() {
                "0" => {
                    writeln!(self.output, "Saindo...")?;
                    break;
                }
                "1" => self.fetch_series().await,
                "2" => self.fetch_episodes().await,
                "3" => self.list_series(),
                "4" => self.find_by_title().map(|_| ()),
                "5" => self.find_by_actor(),
                "6" => self.top_series(),
                "7" => self.find_by_category(),
                "8" => self.filter_series(),
                "9" => self.find_episodes(),
                "10" => self.top_episodes(),
                "11" => self.latest_releases(),
                _ => {
                    writeln!(self.output, "Opção inválida")?;
                    Ok(())
                }
            };

            if let Err(e) = result {
                warn!("Menu option {} failed: {:#}", choice, e);
                writeln!(self.output, "Erro: {:#}", e)?;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Options
    // =========================================================================

    async fn fetch_series(&mut self) -> Result<()> {
        let Some(name) = self.prompt("Digite o nome da série para busca")? else {
            return Ok(());
        };
        let Some(ingestor) = &self.ingestor else {
            writeln!(self.output, "Fonte de metadados (OMDb) não configurada.")?;
            return Ok(());
        };

        match ingestor.ingest_series(&name).await {
            Ok(series) => writeln!(self.output, "{}", describe_series(&series))?,
            Err(IngestError::Catalog(CatalogError::AlreadyExists(title))) => {
                writeln!(self.output, "A série '{}' já está salva.", title)?
            }
            Err(e) => writeln!(self.output, "Não foi possível buscar a série: {}", e)?,
        }
        Ok(())
    }

    async fn fetch_episodes(&mut self) -> Result<()> {
        self.list_series()?;
        let Some(name) = self.prompt("Digite o nome da série para busca de episódios:")? else {
            return Ok(());
        };

        let Some(series) = self.catalog.find_by_title(&name)? else {
            writeln!(self.output, "Série não encontrada!")?;
            return Ok(());
        };

        if !series.episodes.is_empty() {
            writeln!(
                self.output,
                "Esta série já possui {} episódios salvos.",
                series.episodes.len()
            )?;
            let answer = self.prompt(
                "Deseja buscar novamente? Isso irá substituir os episódios existentes. (S/N)",
            )?;
            if !answer.is_some_and(|a| a.eq_ignore_ascii_case("s")) {
                writeln!(self.output, "Operação cancelada.")?;
                return Ok(());
            }
        }

        let Some(ingestor) = &self.ingestor else {
            writeln!(self.output, "Fonte de metadados (OMDb) não configurada.")?;
            return Ok(());
        };

        match ingestor.ingest_episodes(series.id).await {
            Ok(episodes) => writeln!(
                self.output,
                "Episódios salvos com sucesso! Total: {}",
                episodes.len()
            )?,
            Err(IngestError::NoEpisodes(_)) => writeln!(
                self.output,
                "Erro: não foi possível buscar episódios da API. Verifique a chave da OMDb."
            )?,
            Err(e) => writeln!(self.output, "Não foi possível buscar os episódios: {}", e)?,
        }
        Ok(())
    }

    fn list_series(&mut self) -> Result<()> {
        let mut series = self.catalog.list_all()?;
        series.sort_by_key(|s| s.genre);
        for s in &series {
            writeln!(self.output, "{}", describe_series(s))?;
        }
        Ok(())
    }

    fn find_by_title(&mut self) -> Result<Option<Series>> {
        let Some(name) = self.prompt("Escolha uma série pelo nome: ")? else {
            return Ok(None);
        };

        self.last_search = self.catalog.find_by_title(&name)?;
        match &self.last_search {
            Some(series) => writeln!(self.output, "Dados da série: {}", describe_series(series))?,
            None => writeln!(self.output, "Série não encontrada!")?,
        }
        Ok(self.last_search.clone())
    }

    fn find_by_actor(&mut self) -> Result<()> {
        let Some(actor) = self.prompt("Qual o nome do ator/atriz para busca: ")? else {
            return Ok(());
        };
        let Some(min_rating) = self.prompt_number::<f64>("Avaliações a partir de que valor? ")?
        else {
            return Ok(());
        };

        let found = self
            .catalog
            .find_by_actor_and_min_rating(&actor, min_rating)?;
        if found.is_empty() {
            writeln!(
                self.output,
                "Nenhuma série encontrada com o ator {} e avaliação >= {}",
                actor, min_rating
            )?;
            return Ok(());
        }

        writeln!(
            self.output,
            "Séries encontradas com {} e avaliação >= {}:",
            actor, min_rating
        )?;
        for s in &found {
            writeln!(
                self.output,
                "- {} ({}) - Avaliação: {} - Atores: {}",
                s.title, s.genre, s.rating, s.actors
            )?;
        }
        Ok(())
    }

    fn top_series(&mut self) -> Result<()> {
        let top = self.catalog.top_rated(TOP_LIMIT)?;
        writeln!(self.output, "Top 5 Séries:")?;
        for s in &top {
            writeln!(self.output, "- {} - Avaliação: {}", s.title, s.rating)?;
        }
        Ok(())
    }

    fn find_by_category(&mut self) -> Result<()> {
        let Some(name) = self.prompt("Digite uma categoria/gênero: ")? else {
            return Ok(());
        };

        let category = match Category::from_label(&name) {
            Ok(category) => category,
            Err(_) => {
                writeln!(self.output, "Categoria não encontrada: {}", name)?;
                writeln!(self.output, "Categorias disponíveis:")?;
                for c in Category::ALL {
                    writeln!(self.output, "- {}", c.display_label())?;
                }
                return Ok(());
            }
        };

        let found = self.catalog.find_by_category(category)?;
        if found.is_empty() {
            writeln!(self.output, "Nenhuma série encontrada para a categoria: {}", name)?;
            return Ok(());
        }

        writeln!(self.output, "Séries da categoria {}:", category)?;
        for s in &found {
            writeln!(self.output, "{}", describe_series(s))?;
        }
        Ok(())
    }

    fn filter_series(&mut self) -> Result<()> {
        let Some(max_seasons) =
            self.prompt_number::<u32>("Filtrar séries até quantas temporadas? ")?
        else {
            return Ok(());
        };
        let Some(min_rating) =
            self.prompt_number::<f64>("Com avaliação a partir de que valor? ")?
        else {
            return Ok(());
        };

        let found = self
            .catalog
            .find_by_max_seasons_and_min_rating(max_seasons, min_rating)?;
        if found.is_empty() {
            writeln!(
                self.output,
                "Nenhuma série encontrada com até {} temporadas e avaliação >= {}",
                max_seasons, min_rating
            )?;
            return Ok(());
        }

        writeln!(
            self.output,
            "Até {} temporadas, avaliação >= {}:",
            max_seasons, min_rating
        )?;
        for s in &found {
            writeln!(
                self.output,
                "- {} ({} temporadas) - Avaliação: {}",
                s.title, s.total_seasons, s.rating
            )?;
        }
        Ok(())
    }

    fn find_episodes(&mut self) -> Result<()> {
        let Some(fragment) = self.prompt("Qual o nome do episódio para busca?")? else {
            return Ok(());
        };

        let found = self.catalog.find_episodes_by_title(&fragment)?;
        if found.is_empty() {
            writeln!(
                self.output,
                "Nenhum episódio encontrado com o trecho: {}",
                fragment
            )?;
            return Ok(());
        }

        writeln!(self.output, "Episódios encontrados:")?;
        for e in &found {
            writeln!(self.output, "{}", describe_episode(e))?;
        }
        Ok(())
    }

    fn top_episodes(&mut self) -> Result<()> {
        let series = match self.last_search.clone() {
            Some(series) => series,
            None => match self.find_by_title()? {
                Some(series) => series,
                None => return Ok(()),
            },
        };

        let top = self.catalog.top_episodes(series.id, TOP_LIMIT)?;
        if top.is_empty() {
            writeln!(
                self.output,
                "Nenhum episódio encontrado para a série: {}",
                series.title
            )?;
            writeln!(
                self.output,
                "Certifique-se de que os episódios foram salvos (opção 2)."
            )?;
            return Ok(());
        }

        writeln!(self.output, "Top 5 Episódios de {}:", series.title)?;
        for e in &top {
            writeln!(
                self.output,
                "Série: {} | Temporada: {} | Episódio: {} - {} | Avaliação: {:.1}",
                series.title, e.season, e.number, e.title, e.rating
            )?;
        }
        Ok(())
    }

    fn latest_releases(&mut self) -> Result<()> {
        let latest = self.catalog.latest_releases(TOP_LIMIT)?;
        if latest.is_empty() {
            writeln!(self.output, "Nenhum episódio com data de lançamento salvo.")?;
            return Ok(());
        }

        writeln!(self.output, "Lançamentos mais recentes:")?;
        for s in &latest {
            let newest = s.episodes.iter().filter_map(|e| e.release_date).max();
            match newest {
                Some(date) => {
                    writeln!(self.output, "- {} (último episódio em {})", s.title, date)?
                }
                None => writeln!(self.output, "- {}", s.title)?,
            }
        }
        Ok(())
    }

    // =========================================================================
    // Input helpers
    // =========================================================================

    /// Next trimmed input line, or `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        writeln!(self.output, "{}", message)?;
        self.output.flush()?;
        self.read_line()
    }

    /// Prompt for a number; invalid input is reported and yields `None`.
    fn prompt_number<T: FromStr>(&mut self, message: &str) -> io::Result<Option<T>> {
        let Some(text) = self.prompt(message)? else {
            return Ok(None);
        };

        // Accept a decimal comma as well
        match text.replace(',', ".").parse::<T>() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                writeln!(self.output, "Valor inválido: {}", text)?;
                Ok(None)
            }
        }
    }
}

fn describe_series(series: &Series) -> String {
    format!(
        "{} | gênero: {} | temporadas: {} | avaliação: {} | atores: {} | pôster: {} | sinopse: {}",
        series.title,
        series.genre,
        series.total_seasons,
        series.rating,
        series.actors,
        series.poster,
        series.synopsis
    )
}

fn describe_episode(episode: &Episode) -> String {
    let released = episode
        .release_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "desconhecida".to_string());
    format!(
        "T{:02}E{:02} {} | avaliação: {} | lançamento: {}",
        episode.season, episode.number, episode.title, episode.rating, released
    )
}
