/*!

This is the long-form manual for `results_master` and the `consolidate` program.

## Source workbooks

The program scans a root directory, recursively, for Excel files (`.xlsx`) whose
name contains `resultado` or `resultados`, in any case. Each file is the result of
one group of producers (a cooperative or a cluster of clients). The group is taken
from the name of the file:

| file                                | group         |
|-------------------------------------|---------------|
| `NorteCoop_resultados.xlsx`         | `NorteCoop`   |
| `resultado Sul Leite.xlsx`          | `Sul Leite`   |
| `CoopCentral/misc_resultado.xlsx`   | `CoopCentral` |

When neither pattern applies, the name of the folder containing the file is used.

Every source workbook may contain the following sheets. Any of them may be missing.

### `comparativo`

One row per participant. The columns are free; the dashboard expects at least
`Cliente`, `Pontuação Inicial` and `Pontuação Final`.

### `resumo_niveis`

One row per knowledge level, with the number of participants at the start and at the
end of the consultancy:

```text
Nível          Qtd Inicial   Qtd Final
Básico         12            4
Intermediário  6             10
Avançado       1             5
```

The column names do not have to be exact: any column containing `nivel` (or `nível`)
is taken as the level, any column containing `inicial` as the initial count, any
column containing `final` as the final count. The first matching column wins.

### `financeiro_resumo`

Financial indicators of the group, with the columns `Bloco`, `Soma Inicial (todos)`,
`Soma Final (todos)`. Missing sums are counted as zero.

## Master workbook

The output workbook contains up to three sheets. A sheet without rows is not written.

* `comparativo_master`: all the participants, with the `Grupo` column first.
* `niveis_master`: the levels of each group, sorted by group and then by level
  (`Básico`, `Intermediário`, `Avançado`, blank last), followed by the `TOTAL`
  rows summed across all the groups.
* `financeiro_master`: the financial indicators of each group followed by a single
  `TOTAL` row. The columns `Evolução Absoluta` (final minus initial) and
  `% sobre Inicial` are computed for every row; the percentage is left blank when the
  initial sum is zero.

## Configuration

```json
{
    "rootDirectory": "compilação",
    "outputPath": "compilação/master_resultados.xlsx"
}
```

Relative paths are resolved against the folder of the configuration file. When no
output path is given, the master workbook is written as `master_resultados.xlsx` in the
root directory.

*/
